//! In-process backend for local development and tests.

use crate::store::{PageViewStore, PresenceStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mate_core::{PageViewRow, PresenceRecord, Result, ViewCounts};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Presence rows and page counters held in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    presence: RwLock<HashMap<String, DateTime<Utc>>>,
    page_views: RwLock<ViewCounts>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last heartbeat of `user_id`, if it has a row.
    pub fn last_seen(&self, user_id: &str) -> Option<DateTime<Utc>> {
        self.presence.read().get(user_id).copied()
    }

    /// Current count of one page.
    pub fn view_count(&self, page_name: &str) -> u64 {
        self.page_views.read().get(page_name).copied().unwrap_or(0)
    }
}

#[async_trait]
impl PresenceStore for MemoryBackend {
    async fn upsert_presence(&self, record: &PresenceRecord) -> Result<()> {
        self.presence
            .write()
            .insert(record.user_id.clone(), record.last_seen);
        Ok(())
    }

    async fn delete_stale(&self, threshold: DateTime<Utc>) -> Result<u64> {
        let mut presence = self.presence.write();
        let before = presence.len();
        presence.retain(|_, last_seen| *last_seen >= threshold);
        Ok((before - presence.len()) as u64)
    }

    async fn delete_presence(&self, user_id: &str) -> Result<()> {
        self.presence.write().remove(user_id);
        Ok(())
    }

    async fn list_presence(&self) -> Result<Vec<PresenceRecord>> {
        Ok(self
            .presence
            .read()
            .iter()
            .map(|(user_id, last_seen)| PresenceRecord::new(user_id.clone(), *last_seen))
            .collect())
    }

    async fn count_presence(&self) -> Result<u64> {
        Ok(self.presence.read().len() as u64)
    }
}

#[async_trait]
impl PageViewStore for MemoryBackend {
    async fn increment(&self, page_name: &str) -> Result<()> {
        *self
            .page_views
            .write()
            .entry(page_name.to_string())
            .or_insert(0) += 1;
        Ok(())
    }

    async fn all(&self) -> Result<Vec<PageViewRow>> {
        Ok(mate_core::rows_from_counts(&self.page_views.read()))
    }
}
