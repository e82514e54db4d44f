//! Health goal resource: types, validation, storage and HTTP surface.

pub mod handlers;
pub mod routes;
pub mod store;
pub mod types;
pub mod validation;

pub use routes::create_router;
pub use store::GoalStore;
pub use types::{Goal, GoalFields, GoalStatus};
pub use validation::validate_goal;
