//! Match the latest price action for one window against the catalog
//!
//! Unlike generation, where short series silently skip a window, matching
//! without a full window is an error: there is nothing to look up.

use tracing::info;

use crate::error::{AppError, Result};
use crate::models::{Candle, Fingerprint, WindowLabel};
use crate::services::catalog_store::CatalogStore;
use crate::services::fingerprint_generator::FingerprintGenerator;

/// Result of one match run
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// The catalog already held this fingerprint id; nothing was written
    Matched(Fingerprint),
    /// The fingerprint was new and has been appended to the catalog
    Added(Fingerprint),
}

impl MatchOutcome {
    pub fn fingerprint(&self) -> &Fingerprint {
        match self {
            MatchOutcome::Matched(fp) | MatchOutcome::Added(fp) => fp,
        }
    }

    pub fn fingerprint_id(&self) -> &str {
        &self.fingerprint().fingerprint_id
    }

    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }
}

pub struct Matcher<S: CatalogStore> {
    store: S,
}

impl<S: CatalogStore> Matcher<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fingerprint the most recent `window` of `candles` and reconcile it with the catalog
    pub fn match_latest(&self, window: WindowLabel, candles: &[Candle]) -> Result<MatchOutcome> {
        let generator = FingerprintGenerator::new(candles);
        let latest = generator
            .latest(window)
            .ok_or_else(|| AppError::InsufficientData {
                window: window.to_string(),
                available: generator.len(),
                required: window.minutes(),
            })?;

        self.reconcile(latest)
    }

    /// Look the fingerprint up by id, appending it on a miss
    pub fn reconcile(&self, fingerprint: Fingerprint) -> Result<MatchOutcome> {
        if self.store.append_if_absent(fingerprint.clone())? {
            info!(
                "New fingerprint for window {}: {}",
                fingerprint.window_label, fingerprint.fingerprint_id
            );
            Ok(MatchOutcome::Added(fingerprint))
        } else {
            info!(
                "Fingerprint for window {} already cataloged: {}",
                fingerprint.window_label, fingerprint.fingerprint_id
            );
            Ok(MatchOutcome::Matched(fingerprint))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Catalog;
    use crate::services::catalog_store::{JsonCatalogStore, MemoryCatalogStore};
    use chrono::{Duration, TimeZone, Utc};
    use std::fs;
    use tempfile::tempdir;

    fn series(closes: &[f64]) -> Vec<Candle> {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                Candle::new(base + Duration::minutes(i as i64), close, close + 1.0, close - 1.0, close, 2.0)
            })
            .collect()
    }

    #[test]
    fn test_empty_catalog_adds_one_entry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fingerprints.json");
        fs::write(&path, r#"{"fingerprints": [], "price_changes": []}"#).unwrap();

        let matcher = Matcher::new(JsonCatalogStore::new(&path));
        let outcome = matcher
            .match_latest(WindowLabel::Minute5, &series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]))
            .unwrap();

        assert!(!outcome.is_match());
        let catalog = matcher.store().load().unwrap();
        assert_eq!(catalog.fingerprints.len(), 1);
        assert_eq!(catalog.fingerprints[0].fingerprint_id, outcome.fingerprint_id());
        assert_eq!(catalog.fingerprints[0].start_close, 2.0);
    }

    #[test]
    fn test_second_run_matches() {
        let dir = tempdir().unwrap();
        let matcher = Matcher::new(JsonCatalogStore::new(dir.path().join("fingerprints.json")));
        let candles = series(&[10.0, 11.0, 12.0, 11.5, 10.5]);

        let first = matcher.match_latest(WindowLabel::Minute5, &candles).unwrap();
        let second = matcher.match_latest(WindowLabel::Minute5, &candles).unwrap();

        assert!(matches!(first, MatchOutcome::Added(_)));
        assert!(second.is_match());
        assert_eq!(first.fingerprint_id(), second.fingerprint_id());
        assert_eq!(matcher.store().load().unwrap().fingerprints.len(), 1);
    }

    #[test]
    fn test_match_against_generated_catalog() {
        let candles = series(&[5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0]);
        let generated = FingerprintGenerator::new(&candles).generate(WindowLabel::all());
        let total = generated.len();

        let matcher = Matcher::new(MemoryCatalogStore::new(Catalog::new(generated, vec![])));
        let outcome = matcher.match_latest(WindowLabel::Minute5, &candles).unwrap();

        assert!(outcome.is_match());
        assert_eq!(matcher.store().snapshot().unwrap().fingerprints.len(), total);
    }

    #[test]
    fn test_insufficient_candles_is_an_error() {
        let matcher = Matcher::new(MemoryCatalogStore::default());
        let err = matcher
            .match_latest(WindowLabel::Hour1, &series(&[1.0, 2.0, 3.0]))
            .unwrap_err();

        match err {
            AppError::InsufficientData { window, available, required } => {
                assert_eq!(window, "1h");
                assert_eq!(available, 3);
                assert_eq!(required, 60);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matcher.store().snapshot().unwrap().fingerprints.is_empty());
    }

    #[test]
    fn test_corrupt_catalog_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fingerprints.json");
        fs::write(&path, "not json at all").unwrap();

        let matcher = Matcher::new(JsonCatalogStore::new(&path));
        let err = matcher
            .match_latest(WindowLabel::Minute1, &series(&[1.0]))
            .unwrap_err();

        assert!(matches!(err, AppError::CatalogCorrupt { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "not json at all");
    }
}
