//! Taste survey responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Error, Result};
use crate::timestamp;

/// A submitted survey, as received from the form or the JSON API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SurveySubmission {
    /// Preferred alcohol by volume, in percent
    #[validate(range(min = 0.0, max = 100.0))]
    pub abv: Option<f64>,
    /// Drinking mood or occasion (max 64 chars)
    #[validate(length(max = 64))]
    pub mood: Option<String>,
    /// Recommended drink style (max 64 chars)
    #[validate(length(max = 64))]
    pub recommended: Option<String>,
    /// Preferred food pairing (max 64 chars)
    #[validate(length(max = 64))]
    pub food: Option<String>,
}

impl SurveySubmission {
    /// Validates and stamps the submission with the responding client.
    pub fn into_response(self, client_id: impl Into<String>, at: DateTime<Utc>) -> Result<SurveyResponse> {
        self.validate()
            .map_err(|e| Error::validation(e.to_string()))?;
        // NaN compares false against both range bounds
        if self.abv.is_some_and(|abv| !abv.is_finite()) {
            return Err(Error::validation("abv: must be a finite number"));
        }

        Ok(SurveyResponse {
            abv: self.abv,
            mood: non_empty(self.mood),
            recommended: non_empty(self.recommended),
            food: non_empty(self.food),
            client_id: Some(client_id.into()),
            timestamp: Some(at),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// One stored survey row. Every column is optional on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyResponse {
    pub abv: Option<f64>,
    pub mood: Option<String>,
    pub recommended: Option<String>,
    pub food: Option<String>,
    pub client_id: Option<String>,
    #[serde(with = "timestamp::flexible_option")]
    pub timestamp: Option<DateTime<Utc>>,
}
