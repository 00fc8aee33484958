//! Match the most recent price action against the fingerprint catalog
//!
//! Usage:
//! - `btc-fingerprint match --window 1h`
//! - `btc-fingerprint match --window 5m --fingerprints output/fingerprints.json`

use chrono::Utc;
use std::path::PathBuf;

use crate::constants::ASSET_SYMBOL;
use crate::error::Result;
use crate::models::{CandleInterval, Period, WindowLabel};
use crate::services::{
    JsonCatalogStore, MatchOutcome, Matcher, PriceFetcher, PriceRequest, YahooFinanceClient,
};
use crate::utils::get_yahoo_base_url;

/// Run match command
pub fn run(
    fingerprints: PathBuf,
    window: WindowLabel,
    period: Period,
    interval: CandleInterval,
    db_path: PathBuf,
) {
    match match_window(fingerprints, window, period, interval, db_path) {
        Ok(outcome) => println!("{}", describe(window, &outcome)),
        Err(e) => {
            eprintln!("❌ Fingerprint match failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn match_window(
    fingerprints: PathBuf,
    window: WindowLabel,
    period: Period,
    interval: CandleInterval,
    db_path: PathBuf,
) -> Result<MatchOutcome> {
    let request = PriceRequest {
        symbol: ASSET_SYMBOL.to_string(),
        period,
        interval,
        start: window.window_start(Utc::now()),
    };

    let fetcher = PriceFetcher::new(YahooFinanceClient::new(get_yahoo_base_url())?, db_path);
    let series = super::runtime()?.block_on(fetcher.fetch(&request))?;

    let matcher = Matcher::new(JsonCatalogStore::new(fingerprints));
    matcher.match_latest(window, &series.candles)
}

fn describe(window: WindowLabel, outcome: &MatchOutcome) -> String {
    match outcome {
        MatchOutcome::Matched(fp) => format!(
            "Found matching fingerprint for window {}: {}",
            window, fp.fingerprint_id
        ),
        MatchOutcome::Added(fp) => format!(
            "Added new fingerprint for window {}: {}",
            window, fp.fingerprint_id
        ),
    }
}
