use crate::error::ServerError;
use crate::state::ServerState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Health check endpoint (liveness)
/// Returns 200 if server is running
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "userd-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
    }))
}

/// Readiness check endpoint
/// Returns 200 when the user store answers a ping, 503 otherwise
pub async fn readiness_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    match state.users.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "service": "userd-server",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "uptime_seconds": uptime_seconds(),
                "components": {
                    "api": "ready",
                    "store": "ready",
                }
            })),
        ),
        Err(err) => {
            let err = ServerError::from(err);
            tracing::warn!(error = %err, "Store not ready");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "service": "userd-server",
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                    "uptime_seconds": uptime_seconds(),
                    "components": {
                        "api": "ready",
                        "store": "unavailable",
                    },
                    "error": err.to_body().error,
                })),
            )
        }
    }
}
