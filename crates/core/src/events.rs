//! Client milestone events recorded for funnel analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::page::Page;
use crate::timestamp;

/// A page was opened.
pub const EVENT_PAGE_VIEW: &str = "page_view";

/// A survey was submitted.
pub const EVENT_SURVEY_COMPLETED: &str = "survey_completed";

/// The stats dashboard was reached.
pub const EVENT_STATS_VIEWED: &str = "stats_viewed";

/// One row of the client event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientEvent {
    pub client_id: String,
    pub event: String,
    #[serde(default, with = "timestamp::flexible_option")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub page: Option<String>,
}

impl ClientEvent {
    pub fn new(client_id: impl Into<String>, event: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            client_id: client_id.into(),
            event: event.into(),
            timestamp: Some(at),
            page: None,
        }
    }

    pub fn page_view(client_id: impl Into<String>, page: Page, at: DateTime<Utc>) -> Self {
        Self {
            page: Some(page.slug().to_string()),
            ..Self::new(client_id, EVENT_PAGE_VIEW, at)
        }
    }

    pub fn survey_completed(client_id: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::new(client_id, EVENT_SURVEY_COMPLETED, at)
    }

    pub fn stats_viewed(client_id: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::new(client_id, EVENT_STATS_VIEWED, at)
    }

    pub fn is(&self, event: &str) -> bool {
        self.event == event
    }
}
