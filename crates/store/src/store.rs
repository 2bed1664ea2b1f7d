//! Store traits shared by every backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mate_core::{PageViewRow, PresenceRecord, Result};
use std::sync::Arc;

/// Storage for presence rows.
#[async_trait]
pub trait PresenceStore: Send + Sync {
    /// Inserts or refreshes the row for `record.user_id`.
    async fn upsert_presence(&self, record: &PresenceRecord) -> Result<()>;

    /// Deletes rows with `last_seen` strictly older than `threshold`.
    /// Returns how many rows were removed.
    async fn delete_stale(&self, threshold: DateTime<Utc>) -> Result<u64>;

    /// Deletes the row of one user, if any.
    async fn delete_presence(&self, user_id: &str) -> Result<()>;

    /// All presence rows.
    async fn list_presence(&self) -> Result<Vec<PresenceRecord>>;

    /// Number of presence rows.
    async fn count_presence(&self) -> Result<u64> {
        Ok(self.list_presence().await?.len() as u64)
    }

    /// Cheap reachability probe.
    async fn ping(&self) -> Result<()> {
        self.count_presence().await.map(|_| ())
    }
}

/// Storage for page view counters.
#[async_trait]
pub trait PageViewStore: Send + Sync {
    /// Atomically adds one view to `page_name`.
    async fn increment(&self, page_name: &str) -> Result<()>;

    /// All counter rows.
    async fn all(&self) -> Result<Vec<PageViewRow>>;

    /// Whether outcomes of this store reflect the hosted backend's health.
    fn reports_backend_health(&self) -> bool {
        true
    }
}

pub type SharedPresenceStore = Arc<dyn PresenceStore>;
pub type SharedPageViewStore = Arc<dyn PageViewStore>;
