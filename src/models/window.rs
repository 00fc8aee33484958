use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Fingerprint window, a fixed span of consecutive 1-minute candles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WindowLabel {
    Minute1,
    Minute5,
    Minute10,
    Minute30,
    Hour1,
    Hour6,
    Hour12,
    Hour24,
    Day7,
}

impl WindowLabel {
    /// Label used on the command line, in the catalog and in the digest
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowLabel::Minute1 => "1m",
            WindowLabel::Minute5 => "5m",
            WindowLabel::Minute10 => "10m",
            WindowLabel::Minute30 => "30m",
            WindowLabel::Hour1 => "1h",
            WindowLabel::Hour6 => "6h",
            WindowLabel::Hour12 => "12h",
            WindowLabel::Hour24 => "24h",
            WindowLabel::Day7 => "7d",
        }
    }

    /// Window length in minutes, which is also the number of candles it spans
    pub fn minutes(&self) -> usize {
        match self {
            WindowLabel::Minute1 => 1,
            WindowLabel::Minute5 => 5,
            WindowLabel::Minute10 => 10,
            WindowLabel::Minute30 => 30,
            WindowLabel::Hour1 => 60,
            WindowLabel::Hour6 => 6 * 60,
            WindowLabel::Hour12 => 12 * 60,
            WindowLabel::Hour24 => 24 * 60,
            WindowLabel::Day7 => 7 * 24 * 60,
        }
    }

    pub fn duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.minutes() as i64)
    }

    /// Earliest candle needed to fingerprint this window ending at `now`
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration()
    }

    /// Every window, shortest first (the generation order)
    pub fn all() -> [WindowLabel; 9] {
        [
            WindowLabel::Minute1,
            WindowLabel::Minute5,
            WindowLabel::Minute10,
            WindowLabel::Minute30,
            WindowLabel::Hour1,
            WindowLabel::Hour6,
            WindowLabel::Hour12,
            WindowLabel::Hour24,
            WindowLabel::Day7,
        ]
    }

    fn valid_labels() -> String {
        Self::all()
            .iter()
            .map(|w| w.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for WindowLabel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|w| w.as_str() == s.trim())
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "Unknown window '{}'. Valid windows: {}",
                    s,
                    Self::valid_labels()
                ))
            })
    }
}

impl fmt::Display for WindowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for WindowLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WindowLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
