pub mod catalog_store;
pub mod fingerprint_generator;
pub mod matcher;
pub mod price_archive;
pub mod price_fetcher;
pub mod yahoo_finance;

pub use catalog_store::{CatalogStore, JsonCatalogStore, MemoryCatalogStore};
pub use fingerprint_generator::FingerprintGenerator;
pub use matcher::{MatchOutcome, Matcher};
pub use price_archive::PriceArchive;
pub use price_fetcher::{resolve_start_date, PriceFetcher, PriceRequest};
pub use yahoo_finance::YahooFinanceClient;
