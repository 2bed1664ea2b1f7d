//! Append-only CSV datasets under the data directory.

pub mod log;

pub use log::{CsvLog, EventLog, SurveyLog, EVENTS_FILE, SURVEY_FILE};
