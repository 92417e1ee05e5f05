/// Response helpers shared by route handlers
///
/// Success bodies are upstream JSON passed through verbatim; error bodies
/// follow the `{error, details}` contract. Cache provenance is reported via
/// headers: a fresh fetch carries a cache-control lifetime, cache hits and
/// stale fallbacks carry an x-cache marker.
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::errors::ProxyError;
use crate::proxy::{ProxyOutcome, ServeSource};

/// Header reporting cache provenance ("hit" or "stale")
pub const CACHE_STATUS_HEADER: &str = "x-cache";

pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

pub fn error_response(status: StatusCode, error: &str, details: Option<String>) -> Response {
    let body = json!({
        "error": error,
        "details": details.unwrap_or_default(),
    });
    (status, Json(body)).into_response()
}

/// Extract a required, non-empty request parameter
///
/// Returns the ready-to-send 400 response on failure so handlers can bail
/// with `?`-like brevity before any cache or upstream work happens.
pub fn required(value: Option<&str>, name: &'static str) -> Result<String, Response> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Ok(v.to_string()),
        None => {
            let err = ProxyError::MissingParam(name);
            Err(error_response(StatusCode::BAD_REQUEST, &err.to_string(), None))
        }
    }
}

/// Convert a proxy outcome into the HTTP response contract
pub fn proxy_response(outcome: ProxyOutcome, upstream_label: &str) -> Response {
    match outcome {
        ProxyOutcome::Payload { body, source, ttl } => match source {
            ServeSource::Fresh => (
                StatusCode::OK,
                [(
                    header::CACHE_CONTROL,
                    format!("public, max-age={}", ttl.as_secs()),
                )],
                Json(body),
            )
                .into_response(),
            ServeSource::CacheHit => {
                (StatusCode::OK, [(CACHE_STATUS_HEADER, "hit")], Json(body)).into_response()
            }
            ServeSource::Stale => {
                (StatusCode::OK, [(CACHE_STATUS_HEADER, "stale")], Json(body)).into_response()
            }
        },
        ProxyOutcome::UpstreamError { status, body } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            error_response(status, &format!("{} error", upstream_label), Some(body))
        }
        ProxyOutcome::Failed { message } => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("Failed to fetch {} data", upstream_label),
            Some(message),
        ),
    }
}
