//! UTC timestamp text format shared by the catalog file and the fingerprint digest.
//!
//! Timestamps are written as RFC 3339 with an explicit `+00:00` offset and a
//! fractional part only when it is non-zero (`2024-01-01T00:00:00+00:00`).
//! Reading also accepts a space instead of `T`, which older catalogs contain.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::{AppError, Result};

/// Format a timestamp in the canonical catalog form
pub fn format_utc(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Parse a catalog timestamp (offset required)
pub fn parse_utc(value: &str) -> Result<DateTime<Utc>> {
    let normalized = value.trim().replacen(' ', "T", 1);
    DateTime::parse_from_rfc3339(&normalized)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Parse(format!("Invalid timestamp '{}': {}", value, e)))
}

/// Parse a user-supplied ISO-8601 instant.
///
/// Values without an offset are taken as UTC; a bare date means midnight UTC.
pub fn parse_user_instant(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = parse_utc(value) {
        return Ok(dt);
    }

    let normalized = value.replacen(' ', "T", 1);
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(AppError::InvalidInput(format!(
        "Invalid start date '{}'. Expected ISO-8601 like '2024-05-01', '2024-05-01T12:00:00' or '2024-05-01T12:00:00+02:00'",
        value
    )))
}

/// serde `with` module for `DateTime<Utc>` fields
pub mod iso_utc {
    use super::*;

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_utc(ts))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_utc(&raw).map_err(serde::de::Error::custom)
    }
}
