//! Analytics configuration.

use serde::{Deserialize, Serialize};

/// GA4 property credentials and transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Measurement id, e.g. `G-XXXXXXX`
    pub measurement_id: Option<String>,
    /// Measurement Protocol API secret
    pub api_secret: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_endpoint() -> String {
    "https://www.google-analytics.com/mp/collect".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            measurement_id: None,
            api_secret: None,
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AnalyticsConfig {
    /// Both the measurement id and the secret are set and non-blank.
    pub fn is_enabled(&self) -> bool {
        self.credentials().is_some()
    }

    pub(crate) fn credentials(&self) -> Option<(&str, &str)> {
        let id = self.measurement_id.as_deref().map(str::trim)?;
        let secret = self.api_secret.as_deref().map(str::trim)?;
        (!id.is_empty() && !secret.is_empty()).then_some((id, secret))
    }
}
