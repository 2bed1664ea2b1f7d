//! Internal metrics collection.
//!
//! Counters live in memory and are written to the log by the metrics worker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// A value that can go up or down.
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Latency histogram in milliseconds.
#[derive(Debug, Default)]
pub struct Histogram {
    /// Buckets: 10ms, 50ms, 100ms, 250ms, 500ms, 1s, 2s, 3s, +inf
    buckets: [AtomicU64; 9],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 8] = [10, 50, 100, 250, 500, 1000, 2000, 3000];

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        let idx = Self::BUCKET_BOUNDS
            .iter()
            .position(|&bound| ms <= bound)
            .unwrap_or(Self::BUCKET_BOUNDS.len());
        self.buckets[idx].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum.load(Ordering::Relaxed) as f64 / count as f64
        }
    }

    /// Bucket counts keyed by upper bound; `u64::MAX` is the overflow bucket.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .copied()
            .chain(std::iter::once(u64::MAX))
            .zip(self.buckets.iter())
            .map(|(bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics.
#[derive(Debug, Default)]
pub struct Metrics {
    // Presence
    pub heartbeats_sent: Counter,
    pub heartbeat_failures: Counter,
    pub cleanups_run: Counter,
    pub cleanups_throttled: Counter,
    pub cleanup_failures: Counter,
    pub presence_rows_removed: Counter,
    pub active_users_cache_hits: Counter,
    pub active_users_cache_misses: Counter,
    pub active_users_fallbacks: Counter,

    // Page views
    pub page_views_counted: Counter,
    pub page_views_skipped: Counter,
    pub page_view_failures: Counter,

    // Analytics beacon
    pub analytics_events_sent: Counter,
    pub analytics_events_failed: Counter,

    // Local datasets
    pub surveys_recorded: Counter,
    pub dataset_write_failures: Counter,

    // Backend transport
    pub backend_requests: Counter,
    pub backend_errors: Counter,
    pub backend_latency_ms: Histogram,

    pub live_sessions: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub heartbeats_sent: u64,
    pub heartbeat_failures: u64,
    pub cleanups_run: u64,
    pub cleanups_throttled: u64,
    pub cleanup_failures: u64,
    pub presence_rows_removed: u64,
    pub active_users_cache_hits: u64,
    pub active_users_cache_misses: u64,
    pub active_users_fallbacks: u64,
    pub page_views_counted: u64,
    pub page_views_skipped: u64,
    pub page_view_failures: u64,
    pub analytics_events_sent: u64,
    pub analytics_events_failed: u64,
    pub surveys_recorded: u64,
    pub dataset_write_failures: u64,
    pub backend_requests: u64,
    pub backend_errors: u64,
    pub backend_latency_mean_ms: f64,
    pub live_sessions: u64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            heartbeats_sent: self.heartbeats_sent.get(),
            heartbeat_failures: self.heartbeat_failures.get(),
            cleanups_run: self.cleanups_run.get(),
            cleanups_throttled: self.cleanups_throttled.get(),
            cleanup_failures: self.cleanup_failures.get(),
            presence_rows_removed: self.presence_rows_removed.get(),
            active_users_cache_hits: self.active_users_cache_hits.get(),
            active_users_cache_misses: self.active_users_cache_misses.get(),
            active_users_fallbacks: self.active_users_fallbacks.get(),
            page_views_counted: self.page_views_counted.get(),
            page_views_skipped: self.page_views_skipped.get(),
            page_view_failures: self.page_view_failures.get(),
            analytics_events_sent: self.analytics_events_sent.get(),
            analytics_events_failed: self.analytics_events_failed.get(),
            surveys_recorded: self.surveys_recorded.get(),
            dataset_write_failures: self.dataset_write_failures.get(),
            backend_requests: self.backend_requests.get(),
            backend_errors: self.backend_errors.get(),
            backend_latency_mean_ms: self.backend_latency_ms.mean(),
            live_sessions: self.live_sessions.get(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
