//! Heartbeat-based presence tracking.
//!
//! Each session upserts `(user_id, last_seen)` on every heartbeat. Rows older
//! than the timeout are deleted by cleanups, which sessions trigger at most
//! once per interval and the background sweeper runs on a timer. The active
//! count is read through [`ActiveUsersCache`].

use crate::cache::ActiveUsersCache;
use crate::config::PresenceConfig;
use baas_client::SharedPresenceStore;
use chrono::{DateTime, Utc};
use mate_core::{stale_threshold, Attempt, PresenceRecord, Reading, Result, SessionContext};
use std::sync::Arc;
use std::time::{Duration, Instant};
use telemetry::{health, metrics};
use tracing::{debug, warn};

/// Presence tracker over a presence store.
pub struct PresenceTracker {
    store: SharedPresenceStore,
    cache: Arc<ActiveUsersCache>,
    config: PresenceConfig,
}

impl PresenceTracker {
    pub fn new(store: SharedPresenceStore, cache: Arc<ActiveUsersCache>, config: PresenceConfig) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// Creates a tracker with its own cache sized from `config`.
    pub fn with_config(store: SharedPresenceStore, config: PresenceConfig) -> Self {
        let cache = Arc::new(ActiveUsersCache::new(config.cache_ttl()));
        Self::new(store, cache, config)
    }

    pub fn config(&self) -> &PresenceConfig {
        &self.config
    }

    pub fn cache(&self) -> &ActiveUsersCache {
        &self.cache
    }

    /// Refreshes the session's presence row with the current time.
    pub async fn heartbeat(&self, session: &SessionContext) -> Attempt<DateTime<Utc>> {
        self.heartbeat_at(session, Utc::now()).await
    }

    pub async fn heartbeat_at(
        &self,
        session: &SessionContext,
        now: DateTime<Utc>,
    ) -> Attempt<DateTime<Utc>> {
        let record = PresenceRecord::new(session.user_id().to_string(), now);

        match observe(self.store.upsert_presence(&record).await) {
            Ok(()) => {
                metrics().heartbeats_sent.inc();
                Attempt::Applied(now)
            }
            Err(e) => {
                metrics().heartbeat_failures.inc();
                warn!(user_id = %record.user_id, error = %e, "Heartbeat failed");
                Attempt::Failed(e.to_string())
            }
        }
    }

    /// Deletes rows older than the timeout. Returns how many went away.
    pub async fn cleanup(&self) -> Attempt<u64> {
        self.cleanup_at(Utc::now()).await
    }

    pub async fn cleanup_at(&self, now: DateTime<Utc>) -> Attempt<u64> {
        let threshold = stale_threshold(now, self.config.timeout());

        match observe(self.store.delete_stale(threshold).await) {
            Ok(removed) => {
                metrics().cleanups_run.inc();
                metrics().presence_rows_removed.inc_by(removed);
                if removed > 0 {
                    debug!(removed, threshold = %threshold, "Removed stale presence rows");
                }
                Attempt::Applied(removed)
            }
            Err(e) => {
                metrics().cleanup_failures.inc();
                warn!(error = %e, "Presence cleanup failed");
                Attempt::Failed(e.to_string())
            }
        }
    }

    /// Runs [`cleanup`](Self::cleanup) only if this session has not done so
    /// within `interval`.
    pub async fn cleanup_throttled(
        &self,
        session: &mut SessionContext,
        interval: Duration,
    ) -> Attempt<u64> {
        self.cleanup_throttled_at(session, interval, Instant::now(), Utc::now())
            .await
    }

    pub async fn cleanup_throttled_at(
        &self,
        session: &mut SessionContext,
        interval: Duration,
        clock: Instant,
        now: DateTime<Utc>,
    ) -> Attempt<u64> {
        if !session.try_claim_cleanup(clock, interval) {
            metrics().cleanups_throttled.inc();
            debug!(user_id = %session.user_id(), "Cleanup throttled");
            return Attempt::Skipped;
        }
        self.cleanup_at(now).await
    }

    /// Removes the session's own row.
    pub async fn leave(&self, session: &SessionContext) -> Attempt {
        let user_id = session.user_id().to_string();

        match observe(self.store.delete_presence(&user_id).await) {
            Ok(()) => {
                debug!(user_id = %user_id, "Session left");
                Attempt::Applied(())
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to remove presence row");
                Attempt::Failed(e.to_string())
            }
        }
    }

    /// Number of presence rows, served from cache within its TTL.
    ///
    /// On store failure the last known count is returned, or 0.
    pub async fn get_active_users(&self) -> Reading<u64> {
        self.active_users_at(Instant::now()).await
    }

    pub async fn active_users_at(&self, now: Instant) -> Reading<u64> {
        if let Some(count) = self.cache.fresh_at(now) {
            metrics().active_users_cache_hits.inc();
            return Reading::cached(count);
        }
        metrics().active_users_cache_misses.inc();
        self.refresh_active_users_at(now).await
    }

    /// Reads the count from the store, bypassing and then refilling the cache.
    pub async fn refresh_active_users(&self) -> Reading<u64> {
        self.refresh_active_users_at(Instant::now()).await
    }

    async fn refresh_active_users_at(&self, now: Instant) -> Reading<u64> {
        match observe(self.store.count_presence().await) {
            Ok(count) => {
                self.cache.store_at(count, now);
                Reading::fresh(count)
            }
            Err(e) => {
                metrics().active_users_fallbacks.inc();
                warn!(error = %e, "Failed to read active users");
                match self.cache.last_known() {
                    Some(count) => Reading::stale(count),
                    None => Reading::fallback(0),
                }
            }
        }
    }
}

/// Mirrors a store outcome into the backend health component.
fn observe<T>(result: Result<T>) -> Result<T> {
    match &result {
        Ok(_) => health().backend.set_healthy(),
        Err(e) => health().backend.set_unhealthy(e.to_string()),
    }
    result
}
