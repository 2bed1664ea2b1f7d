//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use mate_core::{Freshness, PageViewRow, Reading};
use serde::{Deserialize, Serialize};
use telemetry::ComponentHealthReport;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend_connected: bool,
    pub analytics_enabled: bool,
    pub live_sessions: u64,
    pub components: Vec<ComponentHealthReport>,
}

/// Active user count with where it came from.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActiveUsersResponse {
    pub active_users: u64,
    pub freshness: Freshness,
}

impl From<Reading<u64>> for ActiveUsersResponse {
    fn from(reading: Reading<u64>) -> Self {
        Self {
            active_users: reading.value,
            freshness: reading.freshness,
        }
    }
}

/// Page view table.
#[derive(Debug, Serialize, Deserialize)]
pub struct PageViewsResponse {
    pub page_views: Vec<PageViewRow>,
    pub freshness: Freshness,
}

/// Outcome of a best-effort write.
#[derive(Debug, Serialize, Deserialize)]
pub struct AttemptResponse {
    /// `applied`, `skipped` or `failed`
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl<T> From<mate_core::Attempt<T>> for AttemptResponse {
    fn from(attempt: mate_core::Attempt<T>) -> Self {
        let (outcome, reason) = match attempt {
            mate_core::Attempt::Applied(_) => ("applied", None),
            mate_core::Attempt::Skipped => ("skipped", None),
            mate_core::Attempt::Failed(reason) => ("failed", Some(reason)),
        };
        Self {
            outcome: outcome.to_string(),
            reason,
        }
    }
}

/// Recorded survey.
#[derive(Debug, Serialize, Deserialize)]
pub struct SurveyAccepted {
    pub success: bool,
    pub client_id: String,
    pub recorded_at: DateTime<Utc>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }
}

/// API error type with error codes.
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse::new(msg, code),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::BAD_REQUEST, "VALID_001", msg)
    }

    pub fn validation(errors: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            response: ErrorResponse::new("Validation failed", "VALID_001").with_details(errors),
        }
    }

    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::INTERNAL_SERVER_ERROR, "DATA_001", msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_001", msg)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<mate_core::Error> for ApiError {
    fn from(err: mate_core::Error) -> Self {
        match &err {
            mate_core::Error::Validation(msg) => ApiError::validation(vec![msg.clone()]),
            mate_core::Error::Serialization(e) => ApiError::bad_request(e.to_string()),
            mate_core::Error::Io(_) | mate_core::Error::Csv(_) => ApiError::dataset(err.to_string()),
            _ => {
                let status = StatusCode::from_u16(err.http_status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let code = err.error_code().unwrap_or("INTERNAL_001");
                ApiError::with_code(status, code, err.to_string())
            }
        }
    }
}
