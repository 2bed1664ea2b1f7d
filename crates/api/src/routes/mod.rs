//! HTTP routes.

pub mod health;
pub mod pages;
pub mod presence;
pub mod stats;
pub mod survey;
pub mod views;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::session_middleware;
use crate::state::AppState;

/// Creates the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(pages::home))
        .route("/survey", get(pages::survey_form).post(pages::survey_submit))
        .route("/stats", get(pages::stats_page))
        .route("/api/survey", post(survey::submit_json))
        .route("/api/presence/heartbeat", post(presence::heartbeat_handler))
        .route("/api/presence/leave", post(presence::leave_handler))
        .route("/api/presence/active", get(presence::active_users_handler))
        .route("/api/page-views", get(views::list_handler))
        .route("/api/page-views/:page", post(views::count_handler))
        .route("/api/stats", get(stats::stats_handler))
        // Probes below do not need a session
        .layer(from_fn_with_state(state.clone(), session_middleware))
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::ready_handler))
        .route("/health/live", get(health::live_handler))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
