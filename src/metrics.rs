//! Prometheus metrics for the goal service and the gateway.

use std::time::Instant;

use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Goals created counter metric name.
pub const METRIC_GOALS_CREATED: &str = "goals_created_total";
/// Goals replaced counter metric name.
pub const METRIC_GOALS_REPLACED: &str = "goals_replaced_total";
/// Goals deleted counter metric name.
pub const METRIC_GOALS_DELETED: &str = "goals_deleted_total";
/// Rejected write requests counter metric name.
pub const METRIC_GOAL_REJECTIONS: &str = "goal_rejections_total";
/// Forwarded requests counter metric name.
pub const METRIC_PROXY_REQUESTS: &str = "proxy_requests_total";
/// Upstream failures counter metric name.
pub const METRIC_PROXY_UPSTREAM_ERRORS: &str = "proxy_upstream_errors_total";
/// Forwarding latency metric name.
pub const METRIC_PROXY_LATENCY: &str = "proxy_latency_ms";

/// Initialize all metric descriptions.
/// Call this once at startup, after installing a recorder.
pub fn init_metrics() {
    describe_counter!(METRIC_GOALS_CREATED, "Total number of goals created");
    describe_counter!(METRIC_GOALS_REPLACED, "Total number of goals replaced");
    describe_counter!(METRIC_GOALS_DELETED, "Total number of goals deleted");
    describe_counter!(
        METRIC_GOAL_REJECTIONS,
        "Total number of goal requests rejected, by reason"
    );
    describe_counter!(
        METRIC_PROXY_REQUESTS,
        "Total number of requests forwarded upstream, by status"
    );
    describe_counter!(
        METRIC_PROXY_UPSTREAM_ERRORS,
        "Total number of forwards that could not reach the upstream"
    );
    describe_histogram!(
        METRIC_PROXY_LATENCY,
        "Upstream round-trip latency in milliseconds"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus recorder and describe metrics.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Router serving `GET /metrics` from the given handle.
pub fn metrics_router(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

/// Increment goals created counter.
pub fn inc_goals_created() {
    counter!(METRIC_GOALS_CREATED).increment(1);
}

/// Increment goals replaced counter.
pub fn inc_goals_replaced() {
    counter!(METRIC_GOALS_REPLACED).increment(1);
}

/// Increment goals deleted counter.
pub fn inc_goals_deleted() {
    counter!(METRIC_GOALS_DELETED).increment(1);
}

/// Increment rejected request counter.
pub fn inc_goal_rejections(reason: &'static str) {
    counter!(METRIC_GOAL_REJECTIONS, "reason" => reason).increment(1);
}

/// Increment forwarded request counter.
pub fn inc_proxy_requests(status: u16) {
    counter!(METRIC_PROXY_REQUESTS, "status" => status.to_string()).increment(1);
}

/// Increment upstream failure counter.
pub fn inc_proxy_upstream_errors() {
    counter!(METRIC_PROXY_UPSTREAM_ERRORS).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for an upstream round trip.
pub fn timer_proxy() -> LatencyTimer {
    LatencyTimer::new(METRIC_PROXY_LATENCY)
}
