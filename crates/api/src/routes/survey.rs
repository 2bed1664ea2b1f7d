//! Survey submission.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use mate_core::{ClientEvent, SurveyResponse, SurveySubmission, EVENT_SURVEY_COMPLETED};
use serde_json::{Map, Value};
use telemetry::metrics;
use tracing::{info, warn};

use crate::extractors::Session;
use crate::response::{ApiError, SurveyAccepted};
use crate::state::AppState;

/// Validates and stores one survey and its `survey_completed` event.
pub(crate) async fn record_survey(
    state: &AppState,
    client_id: String,
    submission: SurveySubmission,
) -> Result<SurveyResponse, ApiError> {
    let now = Utc::now();
    let response = submission.into_response(client_id.clone(), now)?;

    state
        .record_survey(response.clone())
        .await
        .map_err(dataset_failure)?;
    state
        .record_event(ClientEvent::survey_completed(client_id.clone(), now))
        .await
        .map_err(dataset_failure)?;

    metrics().surveys_recorded.inc();
    state
        .analytics
        .send_event(&client_id, EVENT_SURVEY_COMPLETED, event_params(&response));

    info!(client_id = %client_id, recommended = ?response.recommended, "Survey recorded");
    Ok(response)
}

fn dataset_failure(err: mate_core::Error) -> ApiError {
    metrics().dataset_write_failures.inc();
    warn!(error = %err, "Failed to store survey");
    ApiError::from(err)
}

fn event_params(response: &SurveyResponse) -> Map<String, Value> {
    let mut params = Map::new();
    if let Some(abv) = response.abv {
        params.insert("abv".into(), abv.into());
    }
    for (key, value) in [
        ("mood", &response.mood),
        ("recommended", &response.recommended),
        ("food", &response.food),
    ] {
        if let Some(value) = value {
            params.insert(key.into(), value.clone().into());
        }
    }
    params
}

/// POST /api/survey
pub async fn submit_json(
    State(state): State<AppState>,
    Session(session): Session,
    Json(submission): Json<SurveySubmission>,
) -> Result<(StatusCode, Json<SurveyAccepted>), ApiError> {
    let client_id = session.lock().await.user_id().to_string();
    let response = record_survey(&state, client_id.clone(), submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(SurveyAccepted {
            success: true,
            client_id,
            recorded_at: response.timestamp.unwrap_or_else(Utc::now),
        }),
    ))
}
