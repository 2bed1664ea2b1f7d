//! Page view endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use dashboard::sorted_page_views;
use mate_core::{Attempt, ClientEvent, Page, SessionContext};

use crate::extractors::{AutoRefresh, Session};
use crate::response::{ApiError, AttemptResponse, PageViewsResponse};
use crate::state::AppState;

/// Counts `page` for this session unless it already was or the request is
/// an auto-refresh. Every real visit is also written to the event log.
pub(crate) async fn count_visit(
    state: &AppState,
    session: &mut SessionContext,
    page: Page,
    is_autorefresh: bool,
) -> Attempt {
    let attempt = state
        .page_counter
        .count_visit(session, page, is_autorefresh)
        .await;

    if attempt != Attempt::Skipped {
        let event = ClientEvent::page_view(session.user_id().to_string(), page, Utc::now());
        state.log_event(event).await;
    }
    attempt
}

/// GET /api/page-views
pub async fn list_handler(State(state): State<AppState>) -> Json<PageViewsResponse> {
    let reading = state.page_counter.get_all_page_views().await;

    Json(PageViewsResponse {
        page_views: sorted_page_views(reading.value),
        freshness: reading.freshness,
    })
}

/// POST /api/page-views/:page
pub async fn count_handler(
    State(state): State<AppState>,
    Session(session): Session,
    AutoRefresh(is_autorefresh): AutoRefresh,
    Path(page): Path<String>,
) -> Result<Json<AttemptResponse>, ApiError> {
    let page = Page::parse(&page).ok_or_else(|| ApiError::bad_request(format!("unknown page: {}", page)))?;

    let mut session = session.lock().await;
    let attempt = count_visit(&state, &mut session, page, is_autorefresh).await;
    Ok(Json(attempt.into()))
}
