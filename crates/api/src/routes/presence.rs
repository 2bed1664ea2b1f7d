//! Presence endpoints.

use axum::{extract::State, Json};

use crate::extractors::Session;
use crate::response::{ActiveUsersResponse, AttemptResponse};
use crate::state::AppState;

/// POST /api/presence/heartbeat
pub async fn heartbeat_handler(
    State(state): State<AppState>,
    Session(session): Session,
) -> Json<AttemptResponse> {
    let session = session.lock().await;
    Json(state.tracker.heartbeat(&session).await.into())
}

/// POST /api/presence/leave
pub async fn leave_handler(
    State(state): State<AppState>,
    Session(session): Session,
) -> Json<AttemptResponse> {
    let session = session.lock().await;
    Json(state.tracker.leave(&session).await.into())
}

/// GET /api/presence/active
pub async fn active_users_handler(State(state): State<AppState>) -> Json<ActiveUsersResponse> {
    Json(state.tracker.get_active_users().await.into())
}
