//! Inflow → survey → stats funnel.

use mate_core::{ClientEvent, EVENT_STATS_VIEWED, EVENT_SURVEY_COMPLETED};
use serde::Serialize;
use std::collections::HashSet;

pub const STAGE_INFLOW: &str = "유입(홈)";
pub const STAGE_SURVEY: &str = "설문 완료";
pub const STAGE_STATS: &str = "통계 페이지 방문";

/// `part` as a percentage of `whole`, or 0 when `whole` is 0.
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStage {
    pub label: String,
    pub sessions: usize,
    /// Conversion from the previous stage, in percent
    pub conversion_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Funnel {
    pub stages: Vec<FunnelStage>,
}

/// Distinct clients reaching each milestone.
///
/// The stats stage only counts clients that also completed the survey.
pub fn funnel(events: &[ClientEvent]) -> Funnel {
    let all: HashSet<&str> = events.iter().map(|e| e.client_id.as_str()).collect();
    let surveyed = clients_with(events, EVENT_SURVEY_COMPLETED);
    let viewed = clients_with(events, EVENT_STATS_VIEWED);

    let inflow = all.len();
    let survey = surveyed.len();
    let stats = surveyed.intersection(&viewed).count();

    let stage = |label: &str, sessions: usize, conversion_pct: f64| FunnelStage {
        label: label.to_string(),
        sessions,
        conversion_pct,
    };

    Funnel {
        stages: vec![
            stage(STAGE_INFLOW, inflow, 100.0),
            stage(STAGE_SURVEY, survey, ratio(survey, inflow)),
            stage(STAGE_STATS, stats, ratio(stats, survey)),
        ],
    }
}

fn clients_with<'a>(events: &'a [ClientEvent], name: &str) -> HashSet<&'a str> {
    events
        .iter()
        .filter(|e| e.is(name))
        .map(|e| e.client_id.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mate_core::Page;

    #[test]
    fn test_ratio_of_empty_stage() {
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(3, 0), 0.0);
        assert_eq!(ratio(1, 4), 25.0);
    }

    #[test]
    fn test_funnel_counts_distinct_clients() {
        let now = Utc::now();
        let events = vec![
            ClientEvent::page_view("a", Page::Home, now),
            ClientEvent::page_view("b", Page::Home, now),
            ClientEvent::page_view("c", Page::Home, now),
            ClientEvent::page_view("d", Page::Home, now),
            ClientEvent::survey_completed("a", now),
            ClientEvent::survey_completed("a", now),
            ClientEvent::survey_completed("b", now),
            ClientEvent::stats_viewed("a", now),
            // Stats without a survey does not count
            ClientEvent::stats_viewed("c", now),
        ];

        let funnel = funnel(&events);
        let sessions: Vec<_> = funnel.stages.iter().map(|s| s.sessions).collect();
        assert_eq!(sessions, vec![4, 2, 1]);
        assert_eq!(funnel.stages[0].conversion_pct, 100.0);
        assert_eq!(funnel.stages[1].conversion_pct, 50.0);
        assert_eq!(funnel.stages[2].conversion_pct, 50.0);
        assert_eq!(funnel.stages[2].label, STAGE_STATS);
    }

    #[test]
    fn test_empty_funnel() {
        let funnel = funnel(&[]);
        assert!(funnel.stages.iter().all(|s| s.sessions == 0));
        assert_eq!(funnel.stages[1].conversion_pct, 0.0);
        assert_eq!(funnel.stages[2].conversion_pct, 0.0);
    }
}
