//! Client-side planner logic: week arithmetic, drag-and-drop reassignment,
//! in-lane ordering, the optimistic state store and its sync with the API.

pub mod calendar;
pub mod client;
pub mod drag;
pub mod reorder;
pub mod store;
