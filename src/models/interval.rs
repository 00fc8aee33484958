use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Candle resolution understood by the market-data provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandleInterval {
    Minute1,
    Minute2,
    Minute5,
    Minute15,
    Minute30,
    Minute60,
    Minute90,
    Hour1,
}

impl CandleInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandleInterval::Minute1 => "1m",
            CandleInterval::Minute2 => "2m",
            CandleInterval::Minute5 => "5m",
            CandleInterval::Minute15 => "15m",
            CandleInterval::Minute30 => "30m",
            CandleInterval::Minute60 => "60m",
            CandleInterval::Minute90 => "90m",
            CandleInterval::Hour1 => "1h",
        }
    }

    pub fn all() -> [CandleInterval; 8] {
        [
            CandleInterval::Minute1,
            CandleInterval::Minute2,
            CandleInterval::Minute5,
            CandleInterval::Minute15,
            CandleInterval::Minute30,
            CandleInterval::Minute60,
            CandleInterval::Minute90,
            CandleInterval::Hour1,
        ]
    }
}

impl FromStr for CandleInterval {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|i| i.as_str() == s.trim())
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::all().iter().map(|i| i.as_str()).collect();
                AppError::InvalidInput(format!(
                    "Invalid interval '{}'. Valid options: {}",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

impl fmt::Display for CandleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for CandleInterval {
    fn default() -> Self {
        CandleInterval::Minute1
    }
}
