//! Fingerprint catalog generation command
//!
//! Downloads BTC candles, archives them, fingerprints every window label and
//! overwrites the catalog file with `{fingerprints, price_changes}`.
//!
//! Usage:
//! - Default (last 7 days, 1-minute candles): `btc-fingerprint generate`
//! - Custom start: `btc-fingerprint generate --start-date 2024-05-01T00:00:00`

use chrono::Utc;
use std::path::PathBuf;

use crate::constants::{ASSET_SYMBOL, PREVIEW_ROWS};
use crate::error::Result;
use crate::models::timestamp::format_utc;
use crate::models::{Candle, CandleInterval, Catalog, Fingerprint, Period, WindowLabel};
use crate::services::{
    resolve_start_date, CatalogStore, FingerprintGenerator, JsonCatalogStore, PriceFetcher,
    PriceRequest, YahooFinanceClient,
};
use crate::utils::get_yahoo_base_url;

/// Run generate command
pub fn run(
    output: PathBuf,
    period: Period,
    interval: CandleInterval,
    start_date: Option<String>,
    db_path: PathBuf,
) {
    if let Err(e) = generate(output, period, interval, start_date, db_path) {
        eprintln!("❌ Fingerprint generation failed: {}", e);
        std::process::exit(1);
    }
}

fn generate(
    output: PathBuf,
    period: Period,
    interval: CandleInterval,
    start_date: Option<String>,
    db_path: PathBuf,
) -> Result<()> {
    let start = resolve_start_date(start_date.as_deref(), &period, Utc::now())?;
    let request = PriceRequest {
        symbol: ASSET_SYMBOL.to_string(),
        period,
        interval,
        start,
    };

    let fetcher = PriceFetcher::new(YahooFinanceClient::new(get_yahoo_base_url())?, db_path);
    let series = super::runtime()?.block_on(fetcher.fetch(&request))?;

    let fingerprints = generate_catalog_entries(&series.candles);
    print_preview(&fingerprints, PREVIEW_ROWS);

    let count = fingerprints.len();
    let store = JsonCatalogStore::new(&output);
    store.save(&Catalog::new(fingerprints, series.price_changes))?;

    println!("✅ Saved {} fingerprints to {}", count, output.display());
    Ok(())
}

/// Fingerprints for every window label, in label order
pub fn generate_catalog_entries(candles: &[Candle]) -> Vec<Fingerprint> {
    FingerprintGenerator::new(candles).generate(WindowLabel::all())
}

fn print_preview(fingerprints: &[Fingerprint], rows: usize) {
    println!("Fingerprint preview:");
    if fingerprints.is_empty() {
        println!("   (no fingerprints: not enough candles for any window)");
        return;
    }

    println!(
        "{:>6} {:>25} {:>25} {:>8} {:>12} {:>12} {:>10} {:>9} {:>10} {:>12}  {}",
        "window",
        "start",
        "end",
        "minutes",
        "start_close",
        "end_close",
        "change",
        "pct",
        "volatility",
        "avg_volume",
        "fingerprint_id"
    );
    for fp in fingerprints.iter().take(rows) {
        println!("{}", format_row(fp));
    }
}

fn format_row(fp: &Fingerprint) -> String {
    format!(
        "{:>6} {:>25} {:>25} {:>8} {:>12.2} {:>12.2} {:>10.2} {:>8.4}% {:>10.4} {:>12.2}  {}",
        fp.window_label.as_str(),
        format_utc(&fp.start_timestamp),
        format_utc(&fp.end_timestamp),
        fp.duration_minutes,
        fp.start_close,
        fp.end_close,
        fp.absolute_change,
        fp.pct_change,
        fp.volatility,
        fp.average_volume,
        fp.fingerprint_id
    )
}
