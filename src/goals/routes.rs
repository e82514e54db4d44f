//! Goal service route definitions.

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use super::handlers::{create_goal, delete_goal, handle_panic, health, list_goals, replace_goal};
use super::store::GoalStore;

/// Mount point of the goal resource.
pub const RESOURCE_PREFIX: &str = "/resource";

/// Create the goal service router over the given store.
pub fn create_router(store: GoalStore) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(RESOURCE_PREFIX, get(list_goals).post(create_goal))
        .route("/resource/", get(list_goals).post(create_goal))
        .route("/resource/:id", put(replace_goal).delete(delete_goal))
        .with_state(store)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}
