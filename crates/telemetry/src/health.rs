//! Health check aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Health status for the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        }
    }
}

/// Health of one dependency, updated by whoever talks to it.
#[derive(Debug)]
pub struct ComponentHealth {
    name: &'static str,
    enabled: AtomicBool,
    healthy: AtomicBool,
    message: parking_lot::RwLock<Option<String>>,
    last_change: parking_lot::RwLock<Option<DateTime<Utc>>>,
}

impl ComponentHealth {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            enabled: AtomicBool::new(true),
            healthy: AtomicBool::new(false),
            message: parking_lot::RwLock::new(None),
            last_change: parking_lot::RwLock::new(None),
        }
    }

    /// Marks an optional dependency as switched off by configuration.
    ///
    /// A disabled component is listed in the report but does not affect
    /// the overall status.
    pub fn set_disabled(&self, msg: impl Into<String>) {
        self.enabled.store(false, Ordering::Relaxed);
        self.healthy.store(false, Ordering::Relaxed);
        *self.message.write() = Some(msg.into());
        *self.last_change.write() = Some(Utc::now());
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_healthy(&self) {
        self.enabled.store(true, Ordering::Relaxed);
        let was = self.healthy.swap(true, Ordering::Relaxed);
        if !was || self.message.read().is_some() {
            *self.message.write() = None;
            *self.last_change.write() = Some(Utc::now());
        }
    }

    pub fn set_unhealthy(&self, msg: impl Into<String>) {
        let was = self.healthy.swap(false, Ordering::Relaxed);
        *self.message.write() = Some(msg.into());
        if was || self.last_change.read().is_none() {
            *self.last_change.write() = Some(Utc::now());
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn message(&self) -> Option<String> {
        self.message.read().clone()
    }

    pub fn last_change(&self) -> Option<DateTime<Utc>> {
        *self.last_change.read()
    }

    fn report(&self) -> ComponentHealthReport {
        ComponentHealthReport {
            name: self.name.to_string(),
            enabled: self.is_enabled(),
            healthy: self.is_healthy(),
            message: self.message(),
            since: self.last_change(),
        }
    }
}

/// Aggregated health status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub components: Vec<ComponentHealthReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealthReport {
    pub name: String,
    pub enabled: bool,
    pub healthy: bool,
    pub message: Option<String>,
    pub since: Option<DateTime<Utc>>,
}

/// Health of the auxiliary services.
pub struct HealthRegistry {
    pub backend: ComponentHealth,
    pub analytics: ComponentHealth,
}

impl HealthRegistry {
    pub const fn new() -> Self {
        Self {
            backend: ComponentHealth::new("backend"),
            analytics: ComponentHealth::new("analytics"),
        }
    }

    /// Generate a health report.
    ///
    /// Pages keep serving without either dependency, so a failing component
    /// degrades the service and only every enabled component failing
    /// reports unhealthy. Disabled components are not counted.
    pub fn report(&self) -> HealthReport {
        let components = vec![self.backend.report(), self.analytics.report()];

        let enabled = components.iter().filter(|c| c.enabled).count();
        let healthy = components.iter().filter(|c| c.enabled && c.healthy).count();
        let status = if healthy == enabled {
            HealthStatus::Healthy
        } else if healthy > 0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Unhealthy
        };

        HealthReport { status, components }
    }
}

impl Default for HealthRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global health registry.
pub static HEALTH: std::sync::LazyLock<HealthRegistry> =
    std::sync::LazyLock::new(HealthRegistry::new);

/// Get the global health registry.
pub fn health() -> &'static HealthRegistry {
    &HEALTH
}
