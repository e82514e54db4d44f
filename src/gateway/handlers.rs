//! Gateway state and its own endpoints.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use url::Url;

use crate::config::GatewayConfig;
use crate::error::AppError;
use crate::utils::now_millis;

/// Service name reported by the health check.
pub const SERVICE_NAME: &str = "API Gateway";

/// State shared with gateway handlers.
#[derive(Debug, Clone)]
pub struct GatewayState {
    /// Client used for upstream calls.
    pub client: reqwest::Client,
    /// Upstream base URL without a trailing slash.
    upstream_base: String,
    /// Port the gateway listens on.
    pub port: u16,
    /// Largest request body forwarded upstream.
    pub max_body_bytes: usize,
}

impl GatewayState {
    /// Build state from validated configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, AppError> {
        let upstream = config.upstream()?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, &upstream, config.port, config.max_body_bytes))
    }

    /// Build state around an existing client.
    pub fn with_client(client: reqwest::Client, upstream: &Url, port: u16, max_body_bytes: usize) -> Self {
        Self {
            client,
            upstream_base: upstream.as_str().trim_end_matches('/').to_string(),
            port,
            max_body_bytes,
        }
    }

    /// Upstream base URL without a trailing slash.
    pub fn upstream_base(&self) -> &str {
        &self.upstream_base
    }

    /// Advertised health URL of the goal service.
    pub fn upstream_health_url(&self) -> String {
        format!("{}/health", self.upstream_base)
    }
}

/// Info response for `GET /`.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    /// Greeting with the listen port.
    pub message: String,
}

/// Upstream health URLs by service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Microservices {
    /// Goal service health URL.
    pub health_goal: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "OK".
    pub status: &'static str,
    /// Service identity.
    pub service: &'static str,
    /// Known upstreams.
    pub microservices: Microservices,
    /// Server time in Unix milliseconds.
    pub timestamp: i64,
}

/// Info handler.
pub async fn root(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(InfoResponse {
        message: format!("API Gateway running on port {}", state.port),
    })
}

/// Health check handler. The upstream is reported, not called.
pub async fn health(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK",
        service: SERVICE_NAME,
        microservices: Microservices {
            health_goal: state.upstream_health_url(),
        },
        timestamp: now_millis(),
    })
}
