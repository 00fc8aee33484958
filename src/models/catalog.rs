use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::candle::PriceChange;
use super::fingerprint::Fingerprint;
use super::window::WindowLabel;

/// Every fingerprint observed so far plus the change index of the last generation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fingerprints: Vec<Fingerprint>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub price_changes: Vec<PriceChange>,
}

impl Catalog {
    pub fn new(fingerprints: Vec<Fingerprint>, price_changes: Vec<PriceChange>) -> Self {
        Self {
            fingerprints,
            price_changes,
        }
    }

    /// First entry carrying `fingerprint_id` (linear scan)
    pub fn find(&self, fingerprint_id: &str) -> Option<&Fingerprint> {
        self.fingerprints
            .iter()
            .find(|fp| fp.fingerprint_id == fingerprint_id)
    }

    pub fn contains(&self, fingerprint_id: &str) -> bool {
        self.find(fingerprint_id).is_some()
    }

    /// Number of stored fingerprints per window label
    pub fn window_counts(&self) -> BTreeMap<WindowLabel, usize> {
        let mut counts = BTreeMap::new();
        for fp in &self.fingerprints {
            *counts.entry(fp.window_label).or_insert(0) += 1;
        }
        counts
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_null_keys_read_as_empty() {
        let catalog: Catalog = serde_json::from_str("{}").unwrap();
        assert_eq!(catalog, Catalog::default());

        let catalog: Catalog =
            serde_json::from_str(r#"{"fingerprints": null, "price_changes": null}"#).unwrap();
        assert!(catalog.fingerprints.is_empty());
        assert!(catalog.price_changes.is_empty());
    }

    #[test]
    fn test_find_on_empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.find("deadbeef").is_none());
        assert!(catalog.window_counts().is_empty());
    }
}
