//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use telemetry::health;

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /health
///
/// Reports dependency health. A down backend shows up here as `degraded`
/// while pages keep serving.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let report = health().report();

    Json(HealthResponse {
        status: report.status.as_str().to_string(),
        backend_connected: health().backend.is_healthy(),
        analytics_enabled: state.analytics.is_enabled(),
        live_sessions: state.sessions.count().await,
        components: report.components,
    })
}

/// GET /health/ready
///
/// Presence, counters and analytics are auxiliary, so dependency health
/// never takes the service out of rotation.
pub async fn ready_handler() -> StatusCode {
    StatusCode::OK
}

/// GET /health/live
pub async fn live_handler() -> StatusCode {
    StatusCode::OK
}
