//! Page view counter persisted as a JSON file.
//!
//! Writes are serialised within this process only; two processes sharing the
//! file will lose updates.

use crate::store::PageViewStore;
use async_trait::async_trait;
use mate_core::{PageViewRow, Result, ViewCounts};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// JSON object of page name to count.
#[derive(Debug)]
pub struct FileViewCounter {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileViewCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the counts, creating an empty file on first use.
    ///
    /// A missing, unreadable, or corrupt file yields an empty map.
    pub async fn load_views(&self) -> ViewCounts {
        if tokio::fs::metadata(&self.path).await.is_err() {
            if let Err(e) = self.save_views(&ViewCounts::new()).await {
                warn!(path = %self.path.display(), error = %e, "Failed to initialise view file");
            }
            return ViewCounts::new();
        }

        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read view file");
                return ViewCounts::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Corrupt view file, starting empty");
            ViewCounts::new()
        })
    }

    /// Writes the counts as indented JSON.
    pub async fn save_views(&self, counts: &ViewCounts) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let body = serde_json::to_string_pretty(counts)?;
        tokio::fs::write(&self.path, body).await?;
        Ok(())
    }

    /// Adds one view to `page_name` unless the request is an automatic
    /// refresh. Returns the counts after the call.
    pub async fn increase_view(&self, page_name: &str, is_autorefresh: bool) -> Result<ViewCounts> {
        if is_autorefresh {
            debug!(page = %page_name, "Auto-refresh, view not counted");
            return Ok(self.load_views().await);
        }

        let _guard = self.write_lock.lock().await;
        let mut counts = self.load_views().await;
        *counts.entry(page_name.to_string()).or_insert(0) += 1;
        self.save_views(&counts).await?;
        Ok(counts)
    }
}

#[async_trait]
impl PageViewStore for FileViewCounter {
    async fn increment(&self, page_name: &str) -> Result<()> {
        self.increase_view(page_name, false).await.map(|_| ())
    }

    async fn all(&self) -> Result<Vec<PageViewRow>> {
        Ok(mate_core::rows_from_counts(&self.load_views().await))
    }

    // A local file, not the hosted backend
    fn reports_backend_health(&self) -> bool {
        false
    }
}
