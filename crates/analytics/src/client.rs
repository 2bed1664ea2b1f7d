//! GA4 Measurement Protocol client.

use crate::config::AnalyticsConfig;
use crate::gtag::GtagContext;
use mate_core::{Attempt, Error, Result};
use serde_json::{json, Map, Value};
use std::time::Duration;
use telemetry::{health, metrics};
use tracing::{debug, warn};

/// Sends custom events to the collect endpoint.
///
/// Without credentials every call is a no-op.
#[derive(Clone)]
pub struct MeasurementClient {
    http: reqwest::Client,
    config: AnalyticsConfig,
}

impl MeasurementClient {
    pub fn new(config: AnalyticsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {}", e)))?;

        if config.is_enabled() {
            health().analytics.set_healthy();
        } else {
            health().analytics.set_disabled("analytics disabled");
            debug!("Analytics disabled: measurement id or api secret missing");
        }

        Ok(Self { http, config })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    /// Snippet context for one page, if analytics is enabled.
    pub fn gtag(&self, page_name: &str) -> Option<GtagContext> {
        let (measurement_id, _) = self.config.credentials()?;
        Some(GtagContext::new(measurement_id, page_name))
    }

    /// Queues an event and returns immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn send_event(&self, client_id: &str, name: &str, params: Map<String, Value>) {
        if !self.is_enabled() {
            return;
        }

        let client = self.clone();
        let client_id = client_id.to_string();
        let name = name.to_string();
        tokio::spawn(async move {
            client.post_event(&client_id, &name, params).await;
        });
    }

    /// Posts one event and waits for the outcome.
    pub async fn post_event(&self, client_id: &str, name: &str, params: Map<String, Value>) -> Attempt {
        let Some((measurement_id, api_secret)) = self.config.credentials() else {
            return Attempt::Skipped;
        };

        let result = self
            .http
            .post(&self.config.endpoint)
            .query(&[("measurement_id", measurement_id), ("api_secret", api_secret)])
            .json(&event_payload(client_id, name, params))
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match result {
            Ok(_) => {
                health().analytics.set_healthy();
                metrics().analytics_events_sent.inc();
                debug!(event = name, client_id = client_id, "Analytics event sent");
                Attempt::Applied(())
            }
            Err(e) => {
                health().analytics.set_unhealthy(e.to_string());
                metrics().analytics_events_failed.inc();
                warn!(event = name, error = %e, "Failed to send analytics event");
                Attempt::Failed(e.to_string())
            }
        }
    }
}

/// Request body for one event.
pub fn event_payload(client_id: &str, name: &str, params: Map<String, Value>) -> Value {
    json!({
        "client_id": client_id,
        "events": [
            {
                "name": name,
                "params": params,
            }
        ],
    })
}
