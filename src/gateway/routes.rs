//! Gateway route definitions.

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{health, root, GatewayState};
use super::proxy::forward;

/// Create the gateway router.
pub fn create_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/goals", any(forward))
        .route("/goals/", any(forward))
        .route("/goals/*rest", any(forward))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
