//! Aggregations behind the stats page.
//!
//! Everything here is a pure function over rows already loaded from the
//! stores and datasets.

pub mod funnel;
pub mod latency;
pub mod report;
pub mod survey;
pub mod views;

pub use funnel::{funnel, ratio, Funnel, FunnelStage};
pub use latency::{survey_to_stats_latency, LatencyBucket, LatencyReport, LatencySummary};
pub use report::StatsReport;
pub use survey::{food_counts, mood_pivot, survey_summary, FoodCount, MoodPivot, SurveyStats, SurveySummary};
pub use views::sorted_page_views;
