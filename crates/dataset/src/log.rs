//! Typed CSV logs.
//!
//! Each log is one CSV file with a header row. Rows are appended under a
//! process-wide lock; readers tolerate missing columns and skip rows they
//! cannot decode.

use mate_core::{ClientEvent, Error, Result, SurveyResponse};
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, OpenOptions};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the client event log.
pub const EVENTS_FILE: &str = "events.csv";

/// File name of the survey results.
pub const SURVEY_FILE: &str = "survey_results.csv";

/// Append-only CSV file of `T` rows.
pub struct CsvLog<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _row: PhantomData<fn(T) -> T>,
}

/// Client milestone events, columns `client_id,event,timestamp,page`.
pub type EventLog = CsvLog<ClientEvent>;

/// Survey responses, columns `abv,mood,recommended,food,client_id,timestamp`.
pub type SurveyLog = CsvLog<SurveyResponse>;

impl EventLog {
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(EVENTS_FILE))
    }
}

impl SurveyLog {
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(SURVEY_FILE))
    }
}

impl<T> CsvLog<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _row: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row, writing the header first if the file is new.
    pub fn append(&self, row: &T) -> Result<()> {
        let _guard = self.write_lock.lock();

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let is_new = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        writer.serialize(row).map_err(csv_error)?;
        writer.flush()?;

        debug!(path = %self.path.display(), "Appended dataset row");
        Ok(())
    }

    /// All decodable rows, or `None` if the file does not exist yet.
    pub fn load(&self) -> Result<Option<Vec<T>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(csv_error)?;

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for record in reader.deserialize::<T>() {
            match record {
                Ok(row) => rows.push(row),
                Err(_) => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(path = %self.path.display(), skipped, "Skipped undecodable dataset rows");
        }

        Ok(Some(rows))
    }
}

fn csv_error(e: csv::Error) -> Error {
    if e.is_io_error() {
        match e.into_kind() {
            csv::ErrorKind::Io(io) => Error::Io(io),
            other => Error::csv(format!("{:?}", other)),
        }
    } else {
        Error::csv(e.to_string())
    }
}
