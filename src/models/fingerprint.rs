//! Window fingerprint record and its content-derived identity.
//!
//! # Identity
//!
//! `fingerprint_id` is the lower-case hex SHA-256 of the concatenation, without
//! separators, of:
//!
//! ```text
//! window_label | start_timestamp | end_timestamp | start_close | end_close | volatility
//! ```
//!
//! Timestamps use [`format_utc`]. Floats use [`canonical_float`]: the shortest
//! decimal that round-trips, always with a `.0` for integral values, switching
//! to `1e-05` / `1.5e+20` style outside `[1e-4, 1e16)`. Changing either format
//! changes every id and breaks comparison against existing catalogs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::timestamp::{format_utc, iso_utc};
use super::window::WindowLabel;

/// Statistical summary of one window instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint {
    #[serde(alias = "window")]
    pub window_label: WindowLabel,

    #[serde(alias = "start", with = "iso_utc")]
    pub start_timestamp: DateTime<Utc>,

    #[serde(alias = "end", with = "iso_utc")]
    pub end_timestamp: DateTime<Utc>,

    pub duration_minutes: usize,
    pub start_close: f64,
    pub end_close: f64,
    pub absolute_change: f64,
    pub pct_change: f64,

    /// Population standard deviation of the closes in the window
    pub volatility: f64,

    pub average_volume: f64,
    pub fingerprint_id: String,
}

/// Digest over the identity fields of a fingerprint
pub fn fingerprint_id(
    window: WindowLabel,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
    start_close: f64,
    end_close: f64,
    volatility: f64,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(window.as_str().as_bytes());
    hasher.update(format_utc(start).as_bytes());
    hasher.update(format_utc(end).as_bytes());
    hasher.update(canonical_float(start_close).as_bytes());
    hasher.update(canonical_float(end_close).as_bytes());
    hasher.update(canonical_float(volatility).as_bytes());
    hex::encode(hasher.finalize())
}

/// Canonical text form of a float used in fingerprint ids
pub fn canonical_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if value == 0.0 || (1e-4..1e16).contains(&magnitude) {
        let text = format!("{}", value);
        if text.contains('.') {
            text
        } else {
            format!("{}.0", text)
        }
    } else {
        // `{:e}` gives "1.5e20" / "1e-5"; pad to a signed two-digit exponent
        let text = format!("{:e}", value);
        match text.split_once('e') {
            Some((mantissa, exponent)) => {
                let exponent: i32 = exponent.parse().unwrap_or(0);
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exponent.abs())
            }
            None => text,
        }
    }
}
