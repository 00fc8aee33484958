//! Yahoo Finance chart API client
//!
//! Fetches OHLCV candles from the public chart endpoint
//! (`/v8/finance/chart/{symbol}?range=..&interval=..`). Rows where any of
//! open/high/low/close is missing are dropped; a missing volume reads as 0.

use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration as StdDuration;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::models::{Candle, CandleInterval, Period};

/// Chart endpoint response envelope
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Yahoo Finance chart client
#[derive(Clone)]
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    /// Create a client against `base_url` (e.g. "https://query1.finance.yahoo.com")
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "Invalid base_url: must start with http:// or https://, got: '{}'",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(StdDuration::from_secs(30))
            .user_agent(concat!("btc-fingerprint/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Fetch the candles for `symbol` over `period` at `interval`, oldest first
    pub async fn get_history(
        &self,
        symbol: &str,
        period: &Period,
        interval: CandleInterval,
    ) -> Result<Vec<Candle>> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}",
            self.base_url, symbol, period, interval
        );
        debug!("Fetching chart data: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Chart request failed: {} (url: {})", e, url)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response body: {}", e)))?;

        // The chart API reports unknown symbols/ranges as 4xx with an error object
        if !status.is_success() {
            if let Ok(parsed) = serde_json::from_str::<ChartResponse>(&body) {
                if let Some(err) = parsed.chart.error {
                    return Err(AppError::NoData(format!(
                        "Yahoo Finance returned no data for {} ({}: {})",
                        symbol, err.code, err.description
                    )));
                }
            }
            return Err(AppError::Network(format!(
                "Yahoo Finance returned error status {}",
                status
            )));
        }

        let candles = parse_chart_response(&body)?;
        if candles.is_empty() {
            return Err(AppError::NoData(format!(
                "Yahoo Finance returned no data for {}. Try a different period or interval.",
                symbol
            )));
        }

        info!(
            "Fetched {} {} candles for {} (period {})",
            candles.len(),
            interval,
            symbol,
            period
        );
        Ok(candles)
    }
}

/// Decode a chart response body into candles sorted by time
fn parse_chart_response(body: &str) -> Result<Vec<Candle>> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Parse(format!("Failed to parse chart response: {}", e)))?;

    if let Some(err) = response.chart.error {
        return Err(AppError::NoData(format!("{}: {}", err.code, err.description)));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut candles: Vec<Candle> = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(idx, &ts)| {
            let value = |series: &[Option<f64>]| series.get(idx).copied().flatten();

            let (Some(open), Some(high), Some(low), Some(close)) = (
                value(&quote.open),
                value(&quote.high),
                value(&quote.low),
                value(&quote.close),
            ) else {
                return None;
            };

            let timestamp = match DateTime::from_timestamp(ts, 0) {
                Some(dt) => dt,
                None => {
                    warn!("Invalid timestamp: {}", ts);
                    return None;
                }
            };

            Some(Candle {
                timestamp,
                open,
                high,
                low,
                close,
                volume: value(&quote.volume).unwrap_or(0.0),
            })
        })
        .collect();

    candles.sort_by_key(|c| c.timestamp);
    candles.dedup_by_key(|c| c.timestamp);
    Ok(candles)
}
