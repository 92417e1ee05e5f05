/// Health and liveness routes
use axum::extract::State;
use axum::response::Response;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::webserver::state::AppState;
use crate::webserver::utils::success_response;

/// Simple health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub uptime_seconds: u64,
    pub cached_entries: usize,
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        cached_entries: state.cache.len(),
    };

    success_response(response)
}

/// GET /api/ping
pub async fn ping() -> Response {
    let message = std::env::var("PING_MESSAGE").unwrap_or_else(|_| "ping".to_string());
    success_response(json!({ "message": message }))
}
