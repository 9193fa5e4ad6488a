pub mod dishes;
pub mod image;
pub mod metrics;
pub mod notes;
pub mod users;
