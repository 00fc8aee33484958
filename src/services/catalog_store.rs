//! Fingerprint catalog persistence
//!
//! The catalog is a single JSON document `{"fingerprints": [...], "price_changes": [...]}`.
//! Writes replace the whole document. There is no locking: two processes
//! updating the same file concurrently race and the last writer wins.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::{Catalog, Fingerprint};

/// Storage seam for the fingerprint catalog
pub trait CatalogStore {
    /// Read the catalog; an absent catalog reads as empty
    fn load(&self) -> Result<Catalog>;

    /// Replace the stored catalog
    fn save(&self, catalog: &Catalog) -> Result<()>;

    /// Append `fingerprint` unless an entry with the same id exists.
    ///
    /// Returns `true` when the fingerprint was added.
    fn append_if_absent(&self, fingerprint: Fingerprint) -> Result<bool> {
        let mut catalog = self.load()?;
        if catalog.contains(&fingerprint.fingerprint_id) {
            return Ok(false);
        }
        catalog.fingerprints.push(fingerprint);
        self.save(&catalog)?;
        Ok(true)
    }
}

/// Catalog stored as a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonCatalogStore {
    path: PathBuf,
}

impl JsonCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogStore for JsonCatalogStore {
    fn load(&self) -> Result<Catalog> {
        if !self.path.exists() {
            debug!("No catalog at {}, starting empty", self.path.display());
            return Ok(Catalog::default());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            AppError::Io(format!("Failed to read catalog {}: {}", self.path.display(), e))
        })?;

        serde_json::from_str(&contents).map_err(|e| AppError::CatalogCorrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    fn save(&self, catalog: &Catalog) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(catalog)?;
        fs::write(&self.path, json).map_err(|e| {
            AppError::Io(format!("Failed to write catalog {}: {}", self.path.display(), e))
        })?;

        info!(
            "Wrote catalog with {} fingerprints to {}",
            catalog.fingerprints.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Catalog held in memory, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    catalog: Mutex<Catalog>,
}

impl MemoryCatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Mutex::new(catalog),
        }
    }

    pub fn snapshot(&self) -> Result<Catalog> {
        self.load()
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn load(&self) -> Result<Catalog> {
        self.catalog
            .lock()
            .map(|c| c.clone())
            .map_err(|_| AppError::Other("Catalog lock poisoned".to_string()))
    }

    fn save(&self, catalog: &Catalog) -> Result<()> {
        let mut guard = self
            .catalog
            .lock()
            .map_err(|_| AppError::Other("Catalog lock poisoned".to_string()))?;
        *guard = catalog.clone();
        Ok(())
    }
}
