use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::timestamp::format_utc;
use crate::models::WindowLabel;
use crate::services::{CatalogStore, JsonCatalogStore, PriceArchive};

pub fn run(fingerprints: PathBuf, db_path: PathBuf) {
    println!("📊 Fingerprint Status\n");

    if let Err(e) = show_catalog(&fingerprints) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }

    println!();

    if let Err(e) = show_archive(&db_path) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn show_catalog(path: &Path) -> Result<()> {
    let catalog = JsonCatalogStore::new(path).load()?;

    println!("🔹 Catalog: {}", path.display());
    if catalog.fingerprints.is_empty() {
        println!("   ⚠️  No fingerprints yet. Run 'generate' first.");
        return Ok(());
    }

    println!("   Fingerprints:  {:>8}", format_number(catalog.fingerprints.len()));
    println!("   Price changes: {:>8}", format_number(catalog.price_changes.len()));

    let counts = catalog.window_counts();
    for window in WindowLabel::all() {
        let count = counts.get(&window).copied().unwrap_or(0);
        println!("   {:>4}: {:>8}", window.as_str(), format_number(count));
    }
    Ok(())
}

fn show_archive(path: &Path) -> Result<()> {
    println!("🔹 Archive: {}", path.display());
    if !path.exists() {
        println!("   ⚠️  No archive yet.");
        return Ok(());
    }

    let runtime = super::runtime()?;
    runtime.block_on(async {
        let archive = PriceArchive::open_read_only(path).await?;
        let count = archive.record_count().await?;
        let range = archive.time_range().await?;
        archive.close().await;

        println!("   Candles: {:>8}", format_number(count.max(0) as usize));
        if let Some((first, last)) = range {
            println!("   Range:   {} → {}", format_utc(&first), format_utc(&last));
        }
        Ok(())
    })
}

fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}
