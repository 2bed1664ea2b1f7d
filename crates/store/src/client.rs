//! REST client for the hosted backend.
//!
//! Speaks the PostgREST dialect the hosted database exposes under
//! `/rest/v1`: table endpoints with `column=op.value` filters and stored
//! procedures under `/rpc`.

use crate::config::BackendConfig;
use crate::store::{PageViewStore, PresenceStore};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use mate_core::{Error, PageViewRow, PresenceRecord, Result};
use reqwest::{header, Method, RequestBuilder, Response};
use serde::de::IgnoredAny;
use std::time::{Duration, Instant};
use telemetry::metrics;
use tracing::{debug, info, warn};
use url::Url;

/// Hosted backend reached over REST.
#[derive(Clone)]
pub struct RestBackend {
    http: reqwest::Client,
    base: Url,
    config: BackendConfig,
}

impl RestBackend {
    /// Creates a new client. Fails on an unparseable URL.
    pub fn new(config: BackendConfig) -> Result<Self> {
        let mut base = Url::parse(&config.url)
            .map_err(|e| Error::config(format!("invalid backend url {}: {}", config.url, e)))?;

        // `Url::join` replaces the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {}", e)))?;

        info!(
            url = %base,
            presence_table = %config.presence_table,
            page_view_table = %config.page_view_table,
            "Created backend client"
        );

        Ok(Self { http, base, config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// URL of a table or RPC endpoint under `/rest/v1/`.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(&format!("rest/v1/{}", path))
            .map_err(|e| Error::config(format!("invalid endpoint {}: {}", path, e)))
    }

    fn table_url(&self, table: &str, filters: &[(&str, String)]) -> Result<Url> {
        let mut url = self.endpoint(table)?;
        if !filters.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (column, value) in filters {
                pairs.append_pair(column, value);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.config.api_key.as_deref() {
            Some(key) => builder
                .header("apikey", key)
                .header(header::AUTHORIZATION, format!("Bearer {}", key)),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let start = Instant::now();
        metrics().backend_requests.inc();

        let result = builder.send().await;
        metrics()
            .backend_latency_ms
            .observe(start.elapsed().as_millis() as u64);

        let response = result.map_err(|e| {
            metrics().backend_errors.inc();
            warn!(error = %e, "Backend request failed");
            Error::backend(e.to_string())
        })?;

        if !response.status().is_success() {
            metrics().backend_errors.inc();
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Backend returned error");
            return Err(Error::backend_status(status.as_u16(), body));
        }

        Ok(response)
    }

    async fn json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        response.json::<T>().await.map_err(|e| {
            warn!(error = %e, "Failed to parse backend response");
            Error::backend(format!("invalid backend response: {}", e))
        })
    }
}

/// Filter selecting rows seen before `threshold`.
pub fn stale_filter(threshold: DateTime<Utc>) -> (&'static str, String) {
    (
        "last_seen",
        format!("lt.{}", threshold.to_rfc3339_opts(SecondsFormat::Millis, true)),
    )
}

/// Filter selecting one user's row.
pub fn user_filter(user_id: &str) -> (&'static str, String) {
    ("user_id", format!("eq.{}", user_id))
}

#[async_trait]
impl PresenceStore for RestBackend {
    async fn upsert_presence(&self, record: &PresenceRecord) -> Result<()> {
        let url = self.table_url(&self.config.presence_table, &[])?;
        let request = self
            .request(Method::POST, url)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(record);

        self.send(request).await?;
        debug!(user_id = %record.user_id, "Upserted presence");
        Ok(())
    }

    async fn delete_stale(&self, threshold: DateTime<Utc>) -> Result<u64> {
        let (column, filter) = stale_filter(threshold);
        let url = self.table_url(
            &self.config.presence_table,
            &[(column, filter), ("select", "user_id".to_string())],
        )?;
        let request = self
            .request(Method::DELETE, url)
            .header("Prefer", "return=representation");

        let removed: Vec<IgnoredAny> = Self::json(self.send(request).await?).await?;
        Ok(removed.len() as u64)
    }

    async fn delete_presence(&self, user_id: &str) -> Result<()> {
        let (column, filter) = user_filter(user_id);
        let url = self.table_url(&self.config.presence_table, &[(column, filter)])?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    async fn list_presence(&self) -> Result<Vec<PresenceRecord>> {
        let url = self.table_url(
            &self.config.presence_table,
            &[("select", "user_id,last_seen".to_string())],
        )?;
        Self::json(self.send(self.request(Method::GET, url)).await?).await
    }

    async fn count_presence(&self) -> Result<u64> {
        let url = self.table_url(
            &self.config.presence_table,
            &[("select", "user_id".to_string())],
        )?;
        let rows: Vec<IgnoredAny> = Self::json(self.send(self.request(Method::GET, url)).await?).await?;
        Ok(rows.len() as u64)
    }

    async fn ping(&self) -> Result<()> {
        let url = self.table_url(
            &self.config.presence_table,
            &[("select", "user_id".to_string()), ("limit", "1".to_string())],
        )?;
        self.send(self.request(Method::GET, url)).await?;
        Ok(())
    }
}

#[async_trait]
impl PageViewStore for RestBackend {
    async fn increment(&self, page_name: &str) -> Result<()> {
        let url = self.endpoint(&format!("rpc/{}", self.config.increment_rpc))?;
        let request = self
            .request(Method::POST, url)
            .json(&serde_json::json!({ "p_page_name": page_name }));

        self.send(request).await?;
        debug!(page = %page_name, "Incremented page view");
        Ok(())
    }

    async fn all(&self) -> Result<Vec<PageViewRow>> {
        let url = self.table_url(
            &self.config.page_view_table,
            &[("select", "page_name,view_count".to_string())],
        )?;
        Self::json(self.send(self.request(Method::GET, url)).await?).await
    }
}
