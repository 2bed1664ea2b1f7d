//! Short-lived cache over the active-user count.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct Entry {
    value: u64,
    fetched_at: Instant,
    expired: bool,
}

/// Last active-user count with the instant it was read.
///
/// Shared by every session of the process so that dashboards refreshing on
/// a timer hit the store at most once per TTL.
#[derive(Debug)]
pub struct ActiveUsersCache {
    ttl: Duration,
    entry: Mutex<Option<Entry>>,
}

impl ActiveUsersCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// The cached value, if it was stored less than `ttl` before `now`.
    pub fn fresh_at(&self, now: Instant) -> Option<u64> {
        let entry = (*self.entry.lock())?;
        let age = now.saturating_duration_since(entry.fetched_at);
        (!entry.expired && age < self.ttl).then_some(entry.value)
    }

    /// The last stored value regardless of age.
    pub fn last_known(&self) -> Option<u64> {
        let entry = *self.entry.lock();
        entry.map(|entry| entry.value)
    }

    pub fn store_at(&self, value: u64, now: Instant) {
        *self.entry.lock() = Some(Entry {
            value,
            fetched_at: now,
            expired: false,
        });
    }

    /// Forces the next read to go to the store.
    pub fn invalidate(&self) {
        if let Some(entry) = self.entry.lock().as_mut() {
            entry.expired = true;
        }
    }
}
