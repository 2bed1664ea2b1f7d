//! Presence tuning.

use mate_core::{Error, Result, ACTIVE_USERS_CACHE_TTL_SECS, CLEANUP_INTERVAL_SECS, PRESENCE_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Presence tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// Seconds without heartbeat before a row is stale
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Seconds the active-user count is served from cache
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Minimum seconds between cleanups triggered by one session
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
    /// Seconds between background sweeps
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_timeout_secs() -> u64 {
    PRESENCE_TIMEOUT_SECS as u64
}

fn default_cache_ttl_secs() -> u64 {
    ACTIVE_USERS_CACHE_TTL_SECS
}

fn default_cleanup_interval_secs() -> u64 {
    CLEANUP_INTERVAL_SECS
}

fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl PresenceConfig {
    pub fn timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.timeout_secs as i64)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Rejects values the background sweep cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval_secs == 0 {
            return Err(Error::config("presence.sweep_interval_secs must be at least 1"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("presence.timeout_secs must be at least 1"));
        }
        Ok(())
    }
}
