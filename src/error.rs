//! Unified error types for the gateway and the goal service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message returned for any unknown goal id.
pub const GOAL_NOT_FOUND: &str = "Health goal not found";

/// Message returned when the upstream service cannot be reached.
pub const UPSTREAM_UNAVAILABLE: &str = "Upstream service unavailable";

/// Message returned for uncaught failures.
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Unified error type for process startup and wiring.
#[derive(Error, Debug)]
pub enum AppError {
    /// Environment could not be deserialized.
    #[error("configuration error: {0}")]
    Env(#[from] envy::Error),

    /// Configuration values were loaded but are invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client construction error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Invalid configuration values.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Upstream URL is not parseable.
    #[error("UPSTREAM_URL is invalid: {0}")]
    InvalidUpstreamUrl(#[from] url::ParseError),

    /// Upstream URL uses an unsupported scheme.
    #[error("UPSTREAM_URL must use http or https, got {scheme}")]
    UnsupportedScheme {
        /// The rejected scheme.
        scheme: String,
    },

    /// Port 0 would bind a random port nobody can find.
    #[error("PORT must be greater than 0")]
    ZeroPort,

    /// `RUST_LOG` is not a valid tracing filter.
    #[error("RUST_LOG is invalid: {0}")]
    InvalidLogFilter(String),

    /// Body limit of zero would reject every forwarded request.
    #[error("MAX_BODY_BYTES must be greater than 0")]
    ZeroBodyLimit,
}

/// Goal service errors, each mapped to an HTTP status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GoalError {
    /// Payload failed schema validation.
    #[error("{0}")]
    Validation(String),

    /// Request body was not valid JSON.
    #[error("{0}")]
    InvalidBody(String),

    /// No goal with the requested id.
    #[error("{}", GOAL_NOT_FOUND)]
    NotFound,
}

impl GoalError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            GoalError::Validation(_) | GoalError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            GoalError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

/// Gateway forwarding errors.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Upstream could not be reached or did not answer.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] reqwest::Error),

    /// Inbound body could not be buffered.
    #[error("failed to read request body: {0}")]
    Body(String),

    /// Inbound body is larger than the forwarding limit.
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },
}

/// JSON error body shared by both services.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
}

/// Build a `{error}` JSON response.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for GoalError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::UpstreamUnavailable(_) => {
                error_response(StatusCode::BAD_GATEWAY, UPSTREAM_UNAVAILABLE)
            }
            GatewayError::Body(message) => error_response(StatusCode::BAD_REQUEST, message),
            err @ GatewayError::PayloadTooLarge { .. } => {
                error_response(StatusCode::PAYLOAD_TOO_LARGE, err.to_string())
            }
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
