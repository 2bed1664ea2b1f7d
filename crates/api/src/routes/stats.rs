//! Statistics report endpoint.

use axum::{extract::State, Json};
use dashboard::StatsReport;

use crate::state::AppState;

/// Reads every source of the stats page concurrently.
///
/// Never fails: unreachable stores and missing datasets become fallbacks
/// and empty sections.
pub(crate) async fn build_report(state: &AppState) -> StatsReport {
    let (page_views, active_users, events, surveys) = tokio::join!(
        state.page_counter.get_all_page_views(),
        state.tracker.get_active_users(),
        state.load_events(),
        state.load_surveys(),
    );

    StatsReport::build(page_views, active_users, events.as_deref(), surveys.as_deref())
}

/// GET /api/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsReport> {
    Json(build_report(&state).await)
}
