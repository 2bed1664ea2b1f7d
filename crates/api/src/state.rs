//! Application state shared across handlers.

use analytics::MeasurementClient;
use dataset::{CsvLog, EventLog, SurveyLog};
use mate_core::{ClientEvent, Error, Result, SurveyResponse};
use realtime::{PageCounter, PresenceTracker};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use std::sync::Arc;
use telemetry::metrics;
use tera::Tera;
use tracing::warn;

use crate::session::{SessionConfig, SessionRegistry};
use crate::templates;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<PresenceTracker>,
    pub page_counter: Arc<PageCounter>,
    pub analytics: Arc<MeasurementClient>,
    pub events: Arc<EventLog>,
    pub surveys: Arc<SurveyLog>,
    pub sessions: SessionRegistry,
    pub templates: Arc<Tera>,
}

impl AppState {
    /// Creates the state with datasets under `data_dir`.
    pub fn new(
        tracker: Arc<PresenceTracker>,
        page_counter: Arc<PageCounter>,
        analytics: MeasurementClient,
        data_dir: impl AsRef<Path>,
        session: SessionConfig,
    ) -> Result<Self> {
        let data_dir = data_dir.as_ref();

        Ok(Self {
            tracker,
            page_counter,
            analytics: Arc::new(analytics),
            events: Arc::new(EventLog::in_dir(data_dir)),
            surveys: Arc::new(SurveyLog::in_dir(data_dir)),
            sessions: SessionRegistry::new(session),
            templates: Arc::new(templates::load()?),
        })
    }

    /// Appends a client event, propagating write failures.
    pub async fn record_event(&self, event: ClientEvent) -> Result<()> {
        append(self.events.clone(), event).await
    }

    /// Appends a client event; failures are logged and dropped.
    pub async fn log_event(&self, event: ClientEvent) {
        let name = event.event.clone();
        if let Err(e) = self.record_event(event).await {
            metrics().dataset_write_failures.inc();
            warn!(event = %name, error = %e, "Failed to record client event");
        }
    }

    pub async fn record_survey(&self, response: SurveyResponse) -> Result<()> {
        append(self.surveys.clone(), response).await
    }

    /// Event log rows, `None` when there is no data yet or it cannot be read.
    pub async fn load_events(&self) -> Option<Vec<ClientEvent>> {
        load(self.events.clone()).await
    }

    pub async fn load_surveys(&self) -> Option<Vec<SurveyResponse>> {
        load(self.surveys.clone()).await
    }
}

async fn append<T>(log: Arc<CsvLog<T>>, row: T) -> Result<()>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    tokio::task::spawn_blocking(move || log.append(&row))
        .await
        .map_err(|e| Error::internal(format!("dataset task failed: {}", e)))?
}

async fn load<T>(log: Arc<CsvLog<T>>) -> Option<Vec<T>>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    let path = log.path().display().to_string();
    let result = tokio::task::spawn_blocking(move || log.load())
        .await
        .map_err(|e| Error::internal(format!("dataset task failed: {}", e)))
        .and_then(|loaded| loaded);

    match result {
        Ok(rows) => rows,
        Err(e) => {
            warn!(path = %path, error = %e, "Failed to load dataset");
            None
        }
    }
}
