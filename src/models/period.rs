use chrono::Duration;
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, Result};

/// Look-back period such as `7d`, `24h` or a provider range like `1mo`.
///
/// The raw text is forwarded to the provider unchanged. Only the
/// `<count><m|h|d|w|y>` forms resolve to a duration, which is needed to
/// derive a default start instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    raw: String,
    duration: Option<Duration>,
}

impl Period {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Resolved look-back length; provider-only ranges (`1mo`, `max`, `ytd`) have none
    pub fn duration(&self) -> Result<Duration> {
        self.duration.ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Unable to parse period '{}'. Expected formats like '7d', '24h', or '60m'.",
                self.raw
            ))
        })
    }
}

fn parse_duration(raw: &str) -> Option<Duration> {
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (count, unit) = raw.split_at(split);
    let count: i64 = count.parse().ok()?;

    match unit {
        "m" => Duration::try_minutes(count),
        "h" => Duration::try_hours(count),
        "" | "d" => Duration::try_days(count),
        "w" => Duration::try_weeks(count),
        "y" => count.checked_mul(365).and_then(Duration::try_days),
        _ => None,
    }
}

/// Ranges the provider accepts that have no fixed length
fn is_provider_range(raw: &str) -> bool {
    match raw.strip_suffix("mo") {
        Some(count) => !count.is_empty() && count.chars().all(|c| c.is_ascii_digit()),
        None => matches!(raw, "ytd" | "max"),
    }
}

impl FromStr for Period {
    type Err = AppError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let raw = s.trim();
        let duration = parse_duration(raw);

        if duration.is_none() && !is_provider_range(raw) {
            return Err(AppError::InvalidInput(format!(
                "Unable to parse period '{}'. Expected formats like '7d', '24h', or '60m' (or a provider range such as '1mo', 'ytd', 'max').",
                s
            )));
        }

        Ok(Self {
            raw: raw.to_string(),
            duration,
        })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
