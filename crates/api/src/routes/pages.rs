//! HTML pages: landing, survey and stats dashboard.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::Utc;
use dashboard::MoodPivot;
use mate_core::limits::{MAX_ABV, MAX_TEXT_FIELD_CHARS, MIN_ABV};
use mate_core::{ClientEvent, Page, SurveySubmission, EVENT_STATS_VIEWED};
use serde::{Deserialize, Serialize};
use serde_json::Map;
use tera::Context;

use crate::extractors::{AutoRefresh, Session};
use crate::response::ApiError;
use crate::routes::stats::build_report;
use crate::routes::survey::record_survey;
use crate::routes::views::count_visit;
use crate::state::AppState;
use crate::templates::render;

/// Seconds between dashboard reloads.
pub const STATS_REFRESH_SECS: u64 = 10;

const MOODS: [&str; 5] = ["혼술", "친구와 함께", "데이트", "선물할거에요", "파티"];
const DRINKS: [&str; 4] = ["위스키", "사케", "전통주", "와인"];

fn page_context(state: &AppState, page: Page, title: &str) -> Context {
    let mut context = Context::new();
    context.insert("title", title);
    context.insert("gtag", &state.analytics.gtag(page.slug()));
    context.insert("refresh_url", &Option::<String>::None);
    context
}

/// GET /
pub async fn home(
    State(state): State<AppState>,
    Session(session): Session,
    AutoRefresh(is_autorefresh): AutoRefresh,
) -> Result<Html<String>, ApiError> {
    {
        let mut session = session.lock().await;
        count_visit(&state, &mut session, Page::Home, is_autorefresh).await;
    }

    let context = page_context(&state, Page::Home, "생명의물");
    render(&state.templates, "home.html", &context)
}

fn survey_context(state: &AppState, errors: &[String]) -> Context {
    let mut context = page_context(state, Page::Survey, "취향 설문 | 생명의물");
    context.insert("errors", errors);
    context.insert("moods", &MOODS);
    context.insert("drinks", &DRINKS);
    context.insert("min_abv", &MIN_ABV);
    context.insert("max_abv", &MAX_ABV);
    context.insert("max_text", &MAX_TEXT_FIELD_CHARS);
    context
}

/// GET /survey
pub async fn survey_form(
    State(state): State<AppState>,
    Session(session): Session,
    AutoRefresh(is_autorefresh): AutoRefresh,
) -> Result<Html<String>, ApiError> {
    {
        let mut session = session.lock().await;
        count_visit(&state, &mut session, Page::Survey, is_autorefresh).await;
    }

    render(&state.templates, "survey.html", &survey_context(&state, &[]))
}

/// Survey form fields as posted by the browser.
#[derive(Debug, Default, Deserialize)]
pub struct SurveyForm {
    pub abv: Option<String>,
    pub mood: Option<String>,
    pub recommended: Option<String>,
    pub food: Option<String>,
}

impl SurveyForm {
    fn into_submission(self) -> Result<SurveySubmission, String> {
        let abv = match self.abv.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<f64>()
                    .ok()
                    .filter(|abv| abv.is_finite())
                    .ok_or_else(|| format!("도수는 숫자로 입력해 주세요: {}", raw))?,
            ),
        };

        Ok(SurveySubmission {
            abv,
            mood: self.mood,
            recommended: self.recommended,
            food: self.food,
        })
    }
}

/// POST /survey
pub async fn survey_submit(
    State(state): State<AppState>,
    Session(session): Session,
    Form(form): Form<SurveyForm>,
) -> Result<Response, ApiError> {
    let submission = match form.into_submission() {
        Ok(submission) => submission,
        Err(message) => return survey_rejected(&state, vec![message]),
    };

    let client_id = session.lock().await.user_id().to_string();
    match record_survey(&state, client_id, submission).await {
        Ok(_) => Ok(Redirect::to("/stats").into_response()),
        Err(err) if err.status == StatusCode::BAD_REQUEST => {
            let mut errors = vec![err.response.error];
            errors.extend(err.response.details.unwrap_or_default());
            survey_rejected(&state, errors)
        }
        Err(err) => Err(err),
    }
}

fn survey_rejected(state: &AppState, errors: Vec<String>) -> Result<Response, ApiError> {
    let html = render(&state.templates, "survey.html", &survey_context(state, &errors))?;
    Ok((StatusCode::BAD_REQUEST, html).into_response())
}

#[derive(Serialize)]
struct MoodCell {
    count: u64,
    pct: f64,
}

#[derive(Serialize)]
struct MoodRow {
    mood: String,
    cells: Vec<MoodCell>,
}

fn mood_rows(pivot: &MoodPivot) -> Vec<MoodRow> {
    pivot
        .moods
        .iter()
        .zip(pivot.counts.iter().zip(&pivot.row_pct))
        .map(|(mood, (counts, pcts))| MoodRow {
            mood: mood.clone(),
            cells: counts
                .iter()
                .zip(pcts)
                .map(|(&count, &pct)| MoodCell { count, pct })
                .collect(),
        })
        .collect()
}

/// GET /stats
///
/// Refreshes this session's presence, runs the throttled cleanup and counts
/// the visit before rendering. Reloads itself every ten seconds; those
/// reloads are flagged as auto-refresh and not counted.
pub async fn stats_page(
    State(state): State<AppState>,
    Session(session): Session,
    AutoRefresh(is_autorefresh): AutoRefresh,
) -> Result<Html<String>, ApiError> {
    {
        let mut session = session.lock().await;
        state.tracker.heartbeat(&session).await;

        let interval = state.tracker.config().cleanup_interval();
        state.tracker.cleanup_throttled(&mut session, interval).await;

        count_visit(&state, &mut session, Page::Stats, is_autorefresh).await;

        if session.mark_stats_viewed() {
            let client_id = session.user_id().to_string();
            state
                .log_event(ClientEvent::stats_viewed(client_id.clone(), Utc::now()))
                .await;
            state
                .analytics
                .send_event(&client_id, EVENT_STATS_VIEWED, Map::new());
        }
    }

    let report = build_report(&state).await;

    let mut context = page_context(&state, Page::Stats, "취향 통계 | 생명의물");
    context.insert("refresh_url", &Some("/stats?autorefresh=1"));
    context.insert("refresh_secs", &STATS_REFRESH_SECS);
    context.insert("active_users_degraded", &report.active_users.freshness.is_degraded());
    context.insert(
        "mood_rows",
        &report
            .survey
            .as_ref()
            .map(|survey| mood_rows(&survey.mood_pivot))
            .unwrap_or_default(),
    );
    context.insert("report", &report);

    render(&state.templates, "stats.html", &context)
}
