//! HTTP handlers for the goal resource.

use std::any::Any;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use super::store::GoalStore;
use super::types::Goal;
use crate::error::{error_response, GoalError, INTERNAL_ERROR};
use crate::metrics;
use crate::utils::now_millis;

/// Service name reported by the health check.
pub const SERVICE_NAME: &str = "Health Goal Service";

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "OK".
    pub status: &'static str,
    /// Service identity.
    pub service: &'static str,
    /// Server time in Unix milliseconds.
    pub timestamp: i64,
}

/// Delete confirmation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    /// Confirmation text.
    pub message: &'static str,
    /// The removed goal, as a one-element list.
    pub deleted_goal: Vec<Goal>,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK",
        service: SERVICE_NAME,
        timestamp: now_millis(),
    })
}

/// `GET /resource`
pub async fn list_goals(State(store): State<GoalStore>) -> Json<Vec<Goal>> {
    Json(store.list().await)
}

/// `POST /resource`
#[instrument(skip_all)]
pub async fn create_goal(
    State(store): State<GoalStore>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Goal>), GoalError> {
    let Json(payload) = payload.map_err(reject_body)?;
    let goal = store.create(&payload).await.inspect_err(log_rejection)?;

    metrics::inc_goals_created();
    info!(id = %goal.id, user_id = %goal.user_id, "Created goal");
    Ok((StatusCode::CREATED, Json(goal)))
}

/// `PUT /resource/:id`
#[instrument(skip_all, fields(id = %id))]
pub async fn replace_goal(
    State(store): State<GoalStore>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Goal>, GoalError> {
    // An unknown id wins over a malformed body.
    let payload = match payload {
        Ok(Json(value)) => value,
        Err(rejection) => {
            if !store.contains(&id).await {
                let err = GoalError::NotFound;
                log_rejection(&err);
                return Err(err);
            }
            return Err(reject_body(rejection));
        }
    };

    let goal = store.replace(&id, &payload).await.inspect_err(log_rejection)?;

    metrics::inc_goals_replaced();
    info!("Replaced goal");
    Ok(Json(goal))
}

/// `DELETE /resource/:id`
#[instrument(skip_all, fields(id = %id))]
pub async fn delete_goal(
    State(store): State<GoalStore>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, GoalError> {
    let goal = store.remove(&id).await.inspect_err(log_rejection)?;

    metrics::inc_goals_deleted();
    info!("Deleted goal");
    Ok(Json(DeleteResponse {
        message: "Health goal deleted",
        deleted_goal: vec![goal],
    }))
}

/// Converts a handler panic into a generic 500.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    error!(detail, "Unhandled error in goal service");

    error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
}

fn reject_body(rejection: JsonRejection) -> GoalError {
    let err = GoalError::InvalidBody(rejection.body_text());
    log_rejection(&err);
    err
}

fn log_rejection(err: &GoalError) {
    let reason = match err {
        GoalError::Validation(_) => "validation",
        GoalError::InvalidBody(_) => "invalid_body",
        GoalError::NotFound => "not_found",
    };
    metrics::inc_goal_rejections(reason);
    warn!(reason, "Rejected goal request: {}", err);
}
