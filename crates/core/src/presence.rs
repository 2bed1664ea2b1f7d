//! Presence rows for realtime active-user tracking.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp;

/// Seconds after the last heartbeat before a session counts as gone.
pub const PRESENCE_TIMEOUT_SECS: i64 = 60;

/// How long the active-user count may be served from cache.
pub const ACTIVE_USERS_CACHE_TTL_SECS: u64 = 15;

/// Default spacing between cleanups triggered by one session.
pub const CLEANUP_INTERVAL_SECS: u64 = 30;

/// A record asserting a session was alive as of `last_seen`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRecord {
    pub user_id: String,
    #[serde(with = "timestamp::flexible")]
    pub last_seen: DateTime<Utc>,
}

impl PresenceRecord {
    pub fn new(user_id: impl Into<String>, last_seen: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            last_seen,
        }
    }
}

/// The cutoff below which rows are stale.
pub fn stale_threshold(now: DateTime<Utc>, timeout: Duration) -> DateTime<Utc> {
    now - timeout
}

/// Default presence timeout as a chrono duration.
pub fn default_timeout() -> Duration {
    Duration::seconds(PRESENCE_TIMEOUT_SECS)
}
