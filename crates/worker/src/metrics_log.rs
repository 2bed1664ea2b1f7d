//! Periodic metrics snapshot in the log.

use telemetry::{health, metrics, MetricsSnapshot};
use tracing::info;

/// Writes the current counters and health as one structured log line.
pub fn log_metrics() -> MetricsSnapshot {
    let snapshot = metrics().snapshot();
    let report = health().report();

    info!(
        status = report.status.as_str(),
        live_sessions = snapshot.live_sessions,
        heartbeats_sent = snapshot.heartbeats_sent,
        heartbeat_failures = snapshot.heartbeat_failures,
        cleanups_run = snapshot.cleanups_run,
        cleanups_throttled = snapshot.cleanups_throttled,
        presence_rows_removed = snapshot.presence_rows_removed,
        cache_hits = snapshot.active_users_cache_hits,
        cache_misses = snapshot.active_users_cache_misses,
        fallbacks = snapshot.active_users_fallbacks,
        page_views_counted = snapshot.page_views_counted,
        page_view_failures = snapshot.page_view_failures,
        analytics_sent = snapshot.analytics_events_sent,
        analytics_failed = snapshot.analytics_events_failed,
        surveys_recorded = snapshot.surveys_recorded,
        backend_requests = snapshot.backend_requests,
        backend_errors = snapshot.backend_errors,
        backend_latency_mean_ms = snapshot.backend_latency_mean_ms,
        "Metrics snapshot"
    );

    snapshot
}
