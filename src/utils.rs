use std::path::PathBuf;

use crate::constants::{self, env};

/// Get fingerprint catalog path from environment variable or use default
pub fn get_catalog_path() -> PathBuf {
    std::env::var(env::CATALOG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(constants::DEFAULT_CATALOG_PATH))
}

/// Get candle archive path from environment variable or use default
pub fn get_archive_path() -> PathBuf {
    std::env::var(env::ARCHIVE_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(constants::DEFAULT_ARCHIVE_PATH))
}

/// Get market-data base URL from environment variable or use default
pub fn get_yahoo_base_url() -> String {
    std::env::var(env::YAHOO_BASE_URL)
        .unwrap_or_else(|_| constants::DEFAULT_YAHOO_BASE_URL.to_string())
}

/// Install the global tracing subscriber (`RUST_LOG` overrides the `info` default)
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}
