//! Worker scheduler for background tasks.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use realtime::PresenceTracker;

use crate::metrics_log::log_metrics;
use crate::sweep::PresenceSweeper;

/// Worker scheduler configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Presence sweep interval
    pub sweep_interval: Duration,
    /// Metrics log interval
    pub metrics_log_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(60),       // 1 minute
            metrics_log_interval: Duration::from_secs(60), // 1 minute
        }
    }
}

/// Background worker scheduler.
pub struct WorkerScheduler {
    config: WorkerConfig,
    tracker: Arc<PresenceTracker>,
}

impl WorkerScheduler {
    pub fn new(config: WorkerConfig, tracker: Arc<PresenceTracker>) -> Self {
        Self { config, tracker }
    }

    /// Starts all background workers.
    pub fn start(self: Arc<Self>) -> Vec<tokio::task::JoinHandle<()>> {
        let mut handles = Vec::new();

        // Presence sweep worker
        let scheduler = self.clone();
        handles.push(tokio::spawn(async move {
            scheduler.run_presence_sweep().await;
        }));

        // Metrics log worker
        let scheduler = self.clone();
        handles.push(tokio::spawn(async move {
            scheduler.run_metrics_log().await;
        }));

        info!(
            sweep_interval_secs = self.config.sweep_interval.as_secs(),
            "Background workers started"
        );
        handles
    }

    async fn run_presence_sweep(&self) {
        let sweeper = PresenceSweeper::new(self.tracker.clone());
        let mut ticker = interval(self.config.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            sweeper.run().await;
        }
    }

    async fn run_metrics_log(&self) {
        let mut ticker = interval(self.config.metrics_log_interval);
        // The first tick completes immediately; skip the empty snapshot
        ticker.tick().await;

        loop {
            ticker.tick().await;
            log_metrics();
        }
    }
}
