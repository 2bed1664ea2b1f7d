//! Timestamp parsing shared by presence rows and CSV datasets.
//!
//! Presence rows have been written both as Unix seconds and as ISO 8601 text,
//! and the CSV datasets carry whatever the writer produced. Everything is read
//! into `DateTime<Utc>` and written back as RFC 3339.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Naive layouts accepted in addition to RFC 3339. Interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse a timestamp from text: RFC 3339, a naive date-time, or Unix seconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    // Postgres renders timestamptz as "2024-01-01 10:00:00+00"
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(ts.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    raw.parse::<f64>().ok().and_then(from_unix_seconds)
}

/// Convert fractional Unix seconds into a UTC timestamp.
pub fn from_unix_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.trunc() as i64;
    let nanos = ((secs - secs.trunc()) * 1e9).round() as u32;
    DateTime::from_timestamp(whole, nanos.min(999_999_999))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Seconds(i64),
    Fractional(f64),
    Text(String),
}

impl RawTimestamp {
    fn resolve(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Seconds(secs) => DateTime::from_timestamp(secs, 0),
            Self::Fractional(secs) => from_unix_seconds(secs),
            Self::Text(text) => parse_timestamp(&text),
        }
    }
}

/// Serde adapter for a required timestamp.
pub mod flexible {
    use super::*;

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        RawTimestamp::deserialize(deserializer)?
            .resolve()
            .ok_or_else(|| serde::de::Error::custom("unrecognised timestamp"))
    }
}

/// Serde adapter for an optional timestamp. Unparseable values become `None`.
pub mod flexible_option {
    use super::*;

    pub fn serialize<S: Serializer>(
        ts: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Ok(Option::<RawTimestamp>::deserialize(deserializer)?.and_then(RawTimestamp::resolve))
    }
}
