//! Time from completing the survey to opening the stats page.

use chrono::{DateTime, Utc};
use mate_core::{ClientEvent, EVENT_STATS_VIEWED, EVENT_SURVEY_COMPLETED};
use serde::Serialize;
use std::collections::HashMap;

/// Bucket edges in minutes; bucket `i` is `[EDGES[i], EDGES[i + 1])`.
const EDGES: [f64; 8] = [0.0, 1.0, 3.0, 5.0, 10.0, 30.0, 60.0, 9999.0];

const LABELS: [&str; 7] = [
    "0~1분",
    "1~3분",
    "3~5분",
    "5~10분",
    "10~30분",
    "30~60분",
    "60분 이상",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencySummary {
    pub count: usize,
    pub mean_min: f64,
    pub median_min: f64,
    pub max_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyBucket {
    pub label: String,
    pub sessions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyReport {
    /// `None` when no client has both milestones
    pub summary: Option<LatencySummary>,
    pub buckets: Vec<LatencyBucket>,
}

/// Minutes between each client's first survey and first stats view.
///
/// Returns `None` when no event carries a timestamp.
pub fn survey_to_stats_latency(events: &[ClientEvent]) -> Option<LatencyReport> {
    if events.iter().all(|e| e.timestamp.is_none()) {
        return None;
    }

    let survey_first = first_seen(events, EVENT_SURVEY_COMPLETED);
    let stats_first = first_seen(events, EVENT_STATS_VIEWED);

    let mut minutes: Vec<f64> = survey_first
        .iter()
        .filter_map(|(client, survey_at)| {
            let stats_at = stats_first.get(client)?;
            Some((*stats_at - *survey_at).num_milliseconds() as f64 / 60_000.0)
        })
        .collect();
    minutes.sort_by(f64::total_cmp);

    Some(LatencyReport {
        summary: summarize(&minutes),
        buckets: bucketize(&minutes),
    })
}

fn first_seen<'a>(events: &'a [ClientEvent], name: &str) -> HashMap<&'a str, DateTime<Utc>> {
    let mut first: HashMap<&str, DateTime<Utc>> = HashMap::new();
    for event in events.iter().filter(|e| e.is(name)) {
        let Some(at) = event.timestamp else { continue };
        first
            .entry(event.client_id.as_str())
            .and_modify(|seen| *seen = (*seen).min(at))
            .or_insert(at);
    }
    first
}

/// `sorted` must be in ascending order.
fn summarize(sorted: &[f64]) -> Option<LatencySummary> {
    let count = sorted.len();
    let max = *sorted.last()?;
    let mid = count / 2;
    let median = if count % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    Some(LatencySummary {
        count,
        mean_min: sorted.iter().sum::<f64>() / count as f64,
        median_min: median,
        max_min: max,
    })
}

fn bucketize(minutes: &[f64]) -> Vec<LatencyBucket> {
    let mut counts = [0usize; LABELS.len()];
    for &value in minutes {
        if let Some(idx) = (0..LABELS.len()).find(|&i| value >= EDGES[i] && value < EDGES[i + 1]) {
            counts[idx] += 1;
        }
    }

    LABELS
        .iter()
        .zip(counts)
        .map(|(label, sessions)| LatencyBucket {
            label: label.to_string(),
            sessions,
        })
        .collect()
}
