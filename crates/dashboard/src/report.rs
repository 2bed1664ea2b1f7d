//! The full statistics report.

use crate::funnel::{funnel, Funnel};
use crate::latency::{survey_to_stats_latency, LatencyReport};
use crate::survey::SurveyStats;
use crate::views::sorted_page_views;
use chrono::{DateTime, Utc};
use mate_core::{ClientEvent, PageViewRow, Reading, SurveyResponse};
use serde::Serialize;

/// Everything the stats page renders.
///
/// Sections backed by a dataset that does not exist yet are `None`.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub generated_at: DateTime<Utc>,
    pub page_views: Reading<Vec<PageViewRow>>,
    pub active_users: Reading<u64>,
    pub funnel: Option<Funnel>,
    pub latency: Option<LatencyReport>,
    pub survey: Option<SurveyStats>,
}

impl StatsReport {
    pub fn build(
        page_views: Reading<Vec<PageViewRow>>,
        active_users: Reading<u64>,
        events: Option<&[ClientEvent]>,
        responses: Option<&[SurveyResponse]>,
    ) -> Self {
        let page_views = Reading {
            value: sorted_page_views(page_views.value),
            freshness: page_views.freshness,
        };

        Self {
            generated_at: Utc::now(),
            page_views,
            active_users,
            funnel: events.map(funnel),
            latency: events.and_then(survey_to_stats_latency),
            survey: responses.map(SurveyStats::from_responses),
        }
    }
}
