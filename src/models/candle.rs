use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp::iso_utc;

/// One OHLCV observation for a fixed time bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket start, always UTC
    #[serde(with = "iso_utc")]
    pub timestamp: DateTime<Utc>,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Close-to-close delta for one timestamp of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    #[serde(with = "iso_utc")]
    pub timestamp: DateTime<Utc>,
    pub price_change: f64,
}

/// Candles plus the change index derived from them
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    pub candles: Vec<Candle>,
    pub price_changes: Vec<PriceChange>,
}

impl PriceSeries {
    /// Sort candles chronologically and derive the change index.
    ///
    /// The first candle has no predecessor and gets a change of `0.0`.
    pub fn from_candles(mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.timestamp);

        let price_changes = candles
            .iter()
            .enumerate()
            .map(|(idx, candle)| PriceChange {
                timestamp: candle.timestamp,
                price_change: if idx == 0 {
                    0.0
                } else {
                    candle.close - candles[idx - 1].close
                },
            })
            .collect();

        Self {
            candles,
            price_changes,
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}
