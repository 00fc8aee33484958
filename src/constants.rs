//! Fixed values shared by the fetcher, the commands and the defaults in `utils`.

/// Market-data symbol for the only asset this tool tracks
pub const ASSET_SYMBOL: &str = "BTC-USD";

/// Default provider period (7 days is the longest range served at 1-minute resolution)
pub const DEFAULT_PERIOD: &str = "7d";

/// Default provider candle interval
pub const DEFAULT_INTERVAL: &str = "1m";

/// Number of fingerprints shown after a generation run
pub const PREVIEW_ROWS: usize = 5;

/// Default location of the fingerprint catalog
pub const DEFAULT_CATALOG_PATH: &str = "output/fingerprints.json";

/// Default location of the SQLite candle archive
pub const DEFAULT_ARCHIVE_PATH: &str = "data/bitcoin_prices.db";

/// Default market-data endpoint
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Environment overrides for the defaults above
pub mod env {
    pub const CATALOG_PATH: &str = "FINGERPRINT_CATALOG";
    pub const ARCHIVE_PATH: &str = "PRICE_ARCHIVE_DB";
    pub const YAHOO_BASE_URL: &str = "YAHOO_FINANCE_BASE_URL";
}
