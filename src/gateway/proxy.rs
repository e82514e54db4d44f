//! Reverse proxy from `/goals` to the goal service's `/resource`.

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use tracing::{debug, instrument, warn};

use super::handlers::GatewayState;
use crate::error::GatewayError;
use crate::goals::routes::RESOURCE_PREFIX;
use crate::metrics;

/// Public prefix routed to the goal service.
pub const GATEWAY_PREFIX: &str = "/goals";

/// Headers that describe a single connection and are never forwarded.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Map a gateway path onto the upstream path.
///
/// Returns `None` for paths outside [`GATEWAY_PREFIX`]. `/goals/` maps to
/// `/resource` rather than `/resource/`.
pub fn rewrite_path(path: &str) -> Option<String> {
    let rest = path.strip_prefix(GATEWAY_PREFIX)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }
    let rest = if rest == "/" { "" } else { rest };
    Some(format!("{RESOURCE_PREFIX}{rest}"))
}

/// Strip connection-level headers plus `host` and `content-length`, which
/// the client recomputes for the upstream.
fn sanitize_request_headers(headers: &mut HeaderMap) {
    strip_hop_by_hop(headers);
    headers.remove("host");
    headers.remove("content-length");
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}

/// Buffer an inbound body, refusing anything over `max_bytes`.
///
/// A declared `content-length` over the limit is rejected before reading.
pub async fn read_body_bounded(
    headers: &HeaderMap,
    body: Body,
    max_bytes: usize,
) -> Result<Bytes, GatewayError> {
    let too_large = GatewayError::PayloadTooLarge { limit: max_bytes };

    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());
    if declared.is_some_and(|len| len > max_bytes) {
        return Err(too_large);
    }

    let mut stream = body.into_data_stream();
    let mut buffered = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| GatewayError::Body(e.to_string()))?;
        if buffered.len().saturating_add(chunk.len()) > max_bytes {
            return Err(too_large);
        }
        buffered.extend_from_slice(&chunk);
    }

    Ok(Bytes::from(buffered))
}

/// Forward any `/goals` request upstream and relay the answer.
#[instrument(skip_all, fields(method = %request.method(), path = %request.uri().path()))]
pub async fn forward(State(state): State<GatewayState>, request: Request) -> Result<Response, GatewayError> {
    let (parts, body) = request.into_parts();

    let Some(path) = rewrite_path(parts.uri.path()) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    let mut target = format!("{}{}", state.upstream_base(), path);
    if let Some(query) = parts.uri.query() {
        target.push('?');
        target.push_str(query);
    }

    let body = read_body_bounded(&parts.headers, body, state.max_body_bytes)
        .await
        .inspect_err(|e| warn!("Refusing request body: {}", e))?;

    let mut headers = parts.headers;
    sanitize_request_headers(&mut headers);

    let mut outgoing = state.client.request(parts.method, &target).headers(headers);
    if !body.is_empty() {
        outgoing = outgoing.body(body);
    }

    debug!(%target, "Forwarding request");
    let timer = metrics::timer_proxy();
    let upstream = outgoing.send().await.inspect_err(log_upstream_error)?;
    let status = upstream.status();
    let mut response_headers = upstream.headers().clone();
    let bytes = upstream.bytes().await.inspect_err(log_upstream_error)?;
    drop(timer);

    metrics::inc_proxy_requests(status.as_u16());
    debug!(status = status.as_u16(), "Upstream responded");

    strip_hop_by_hop(&mut response_headers);
    response_headers.remove("content-length");

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    Ok(response)
}

fn log_upstream_error(err: &reqwest::Error) {
    metrics::inc_proxy_upstream_errors();
    warn!("Upstream request failed: {}", err);
}
