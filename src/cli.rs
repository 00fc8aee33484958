use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::constants::{DEFAULT_INTERVAL, DEFAULT_PERIOD};
use crate::models::{CandleInterval, Period, WindowLabel};
use crate::utils::{get_archive_path, get_catalog_path};

#[derive(Parser)]
#[command(name = "btc-fingerprint")]
#[command(about = "Bitcoin price-action fingerprints", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download candles and write a fresh fingerprint catalog
    Generate {
        /// Path where the fingerprint catalog should be stored (JSON)
        #[arg(long, default_value_os_t = get_catalog_path())]
        output: PathBuf,

        /// Look-back period sent to the provider (e.g. 7d, 24h, 60m, 1mo)
        #[arg(long, default_value = DEFAULT_PERIOD)]
        period: Period,

        /// Candle interval sent to the provider
        #[arg(long, default_value = DEFAULT_INTERVAL)]
        interval: CandleInterval,

        /// Earliest candle to keep (ISO-8601). Defaults to now minus the period
        #[arg(long)]
        start_date: Option<String>,

        /// SQLite database used to archive raw candles
        #[arg(long, default_value_os_t = get_archive_path())]
        db_path: PathBuf,
    },
    /// Fingerprint the latest window and look it up in the catalog
    Match {
        /// Path to the fingerprint catalog
        #[arg(long, default_value_os_t = get_catalog_path())]
        fingerprints: PathBuf,

        /// Window label to match (1m, 5m, 10m, 30m, 1h, 6h, 12h, 24h, 7d)
        #[arg(long)]
        window: WindowLabel,

        /// Look-back period sent to the provider
        #[arg(long, default_value = DEFAULT_PERIOD)]
        period: Period,

        /// Candle interval sent to the provider
        #[arg(long, default_value = DEFAULT_INTERVAL)]
        interval: CandleInterval,

        /// SQLite database used to archive raw candles
        #[arg(long, default_value_os_t = get_archive_path())]
        db_path: PathBuf,
    },
    /// Show catalog and archive contents
    Status {
        /// Path to the fingerprint catalog
        #[arg(long, default_value_os_t = get_catalog_path())]
        fingerprints: PathBuf,

        /// SQLite database with archived candles
        #[arg(long, default_value_os_t = get_archive_path())]
        db_path: PathBuf,
    },
}

pub fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            output,
            period,
            interval,
            start_date,
            db_path,
        } => {
            commands::generate::run(output, period, interval, start_date, db_path);
        }
        Commands::Match {
            fingerprints,
            window,
            period,
            interval,
            db_path,
        } => {
            commands::match_window::run(fingerprints, window, period, interval, db_path);
        }
        Commands::Status {
            fingerprints,
            db_path,
        } => {
            commands::status::run(fingerprints, db_path);
        }
    }
}
