//! Price series retrieval: download, restrict to the requested start, archive.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::models::timestamp::{format_utc, parse_user_instant};
use crate::models::{Candle, CandleInterval, Period, PriceSeries};
use crate::services::price_archive::PriceArchive;
use crate::services::yahoo_finance::YahooFinanceClient;

/// Parameters for one price download
#[derive(Debug, Clone)]
pub struct PriceRequest {
    pub symbol: String,
    pub period: Period,
    pub interval: CandleInterval,
    /// Candles before this instant are discarded
    pub start: DateTime<Utc>,
}

/// Downloads candles and archives them as a side effect
pub struct PriceFetcher {
    client: YahooFinanceClient,
    archive_path: PathBuf,
}

impl PriceFetcher {
    pub fn new(client: YahooFinanceClient, archive_path: impl Into<PathBuf>) -> Self {
        Self {
            client,
            archive_path: archive_path.into(),
        }
    }

    /// Fetch the series for `request` and upsert it into the archive.
    ///
    /// An archive failure is logged and does not fail the fetch.
    pub async fn fetch(&self, request: &PriceRequest) -> Result<PriceSeries> {
        let candles = self
            .client
            .get_history(&request.symbol, &request.period, request.interval)
            .await?;

        let series = restrict_to_start(candles, request.start)?;

        if let Err(e) = self.archive(&series.candles).await {
            warn!(
                "Failed to archive candles to {}: {}",
                self.archive_path.display(),
                e
            );
        }

        Ok(series)
    }

    async fn archive(&self, candles: &[Candle]) -> Result<usize> {
        let archive = PriceArchive::open(&self.archive_path).await?;
        let result = archive.upsert_candles(candles).await;
        archive.close().await;
        result
    }
}

/// Keep candles at or after `start` and derive the change index
pub fn restrict_to_start(candles: Vec<Candle>, start: DateTime<Utc>) -> Result<PriceSeries> {
    let total = candles.len();
    let kept: Vec<Candle> = candles
        .into_iter()
        .filter(|c| c.timestamp >= start)
        .collect();

    if kept.is_empty() {
        return Err(AppError::NoData(format!(
            "No Bitcoin candles were available on or after the requested start date {}",
            format_utc(&start)
        )));
    }

    info!(
        "Kept {} of {} candles from {}",
        kept.len(),
        total,
        format_utc(&start)
    );
    Ok(PriceSeries::from_candles(kept))
}

/// Start instant for a generation run: explicit ISO-8601 value, else `now - period`.
///
/// Provider-only ranges such as `1mo` need an explicit start.
pub fn resolve_start_date(
    start_date: Option<&str>,
    period: &Period,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    match start_date {
        Some(value) => parse_user_instant(value),
        None => Ok(now - period.duration()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tempfile::tempdir;

    fn candles(count: i64) -> Vec<Candle> {
        let base = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        (0..count)
            .map(|i| {
                let close = 100.0 + i as f64;
                Candle::new(base + Duration::minutes(i), close, close, close, close, 1.0)
            })
            .collect()
    }

    #[test]
    fn test_restrict_to_start_is_inclusive() {
        let start = Utc.with_ymd_and_hms(2024, 4, 1, 0, 3, 0).unwrap();
        let series = restrict_to_start(candles(10), start).unwrap();

        assert_eq!(series.len(), 7);
        assert_eq!(series.candles[0].timestamp, start);
        assert_eq!(series.price_changes[0].price_change, 0.0);
        assert_eq!(series.price_changes[1].price_change, 1.0);
    }

    #[test]
    fn test_restrict_to_start_empty_is_no_data() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let err = restrict_to_start(candles(10), start).unwrap_err();
        assert!(matches!(err, AppError::NoData(_)));
    }

    #[test]
    fn test_resolve_start_date() {
        let now = Utc.with_ymd_and_hms(2024, 4, 8, 0, 0, 0).unwrap();
        let period: Period = "7d".parse().unwrap();

        assert_eq!(
            resolve_start_date(None, &period, now).unwrap(),
            Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            resolve_start_date(Some("2024-04-05T06:00:00"), &period, now).unwrap(),
            Utc.with_ymd_and_hms(2024, 4, 5, 6, 0, 0).unwrap()
        );
        assert!(resolve_start_date(Some("not-a-date"), &period, now).is_err());
    }

    #[test]
    fn test_resolve_start_date_provider_range() {
        let now = Utc.with_ymd_and_hms(2024, 4, 8, 0, 0, 0).unwrap();
        let period: Period = "1mo".parse().unwrap();

        assert!(matches!(
            resolve_start_date(None, &period, now),
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(
            resolve_start_date(Some("2024-03-08"), &period, now).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_archive_writes_candles() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("prices.db");
        let client = YahooFinanceClient::new("http://127.0.0.1:9").unwrap();
        let fetcher = PriceFetcher::new(client, &db_path);

        let written = fetcher.archive(&candles(5)).await.unwrap();
        assert_eq!(written, 5);

        let archive = PriceArchive::open(&db_path).await.unwrap();
        assert_eq!(archive.record_count().await.unwrap(), 5);
        archive.close().await;
    }

    const TWO_CANDLES: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [1704067200, 1704067260],
                "indicators": {
                    "quote": [{
                        "open":   [42000.0, 42010.0],
                        "high":   [42020.0, 42030.0],
                        "low":    [41990.0, 42000.0],
                        "close":  [42010.0, 42025.0],
                        "volume": [5, 7]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    async fn chart_server() -> mockito::ServerGuard {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Regex(r"^/v8/finance/chart/BTC-USD".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(TWO_CANDLES)
            .create_async()
            .await;
        server
    }

    fn request() -> PriceRequest {
        PriceRequest {
            symbol: "BTC-USD".to_string(),
            period: "7d".parse().unwrap(),
            interval: CandleInterval::Minute1,
            start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_fetch_archives_series() {
        let server = chart_server().await;
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("prices.db");
        let fetcher = PriceFetcher::new(YahooFinanceClient::new(server.url()).unwrap(), &db_path);

        let series = fetcher.fetch(&request()).await.unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.price_changes[1].price_change, 15.0);

        let archive = PriceArchive::open(&db_path).await.unwrap();
        assert_eq!(archive.record_count().await.unwrap(), 2);
        archive.close().await;
    }

    #[tokio::test]
    async fn test_fetch_survives_archive_failure() {
        let server = chart_server().await;
        let temp_dir = tempdir().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, "regular file").unwrap();
        let fetcher = PriceFetcher::new(
            YahooFinanceClient::new(server.url()).unwrap(),
            blocker.join("prices.db"),
        );

        let series = fetcher.fetch(&request()).await.unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.candles[1].close, 42025.0);
    }
}
