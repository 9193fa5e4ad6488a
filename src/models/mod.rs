pub mod auth;
pub mod dish;
pub mod note;
pub mod user;
