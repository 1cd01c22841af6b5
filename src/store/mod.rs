//! JSON-file-backed product record store.
//!
//! One record per product, keyed by the ID carried over from the input
//! spreadsheet. The whole store is small enough to hold in memory; it is
//! loaded once per command and written back after mutations.

use crate::worten::models::Listing;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A tracked product: the imported identity plus the latest scrape result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Stable identifier from the input spreadsheet.
    pub id: String,
    /// EAN barcode, may be empty.
    #[serde(default)]
    pub ean: String,
    /// Product name from the input spreadsheet.
    pub original_name: String,
    /// Name found on Worten.
    #[serde(default)]
    pub worten_name: Option<String>,
    /// Product page URL on Worten.
    #[serde(default)]
    pub worten_url: Option<String>,
    /// Lowest price found.
    #[serde(default)]
    pub lowest_price: Option<Decimal>,
    /// Seller offering the lowest price.
    #[serde(default)]
    pub seller_name: Option<String>,
    /// Availability at the last scrape.
    #[serde(default)]
    pub is_available: bool,
    /// When the product was last scraped.
    #[serde(default)]
    pub last_scraped: Option<DateTime<Utc>>,
    /// Error from the last scrape, if any.
    #[serde(default)]
    pub scrape_error: Option<String>,
}

impl ProductRecord {
    fn new(id: impl Into<String>, ean: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ean: ean.into(),
            original_name: name.into(),
            worten_name: None,
            worten_url: None,
            lowest_price: None,
            seller_name: None,
            is_available: false,
            last_scraped: None,
            scrape_error: None,
        }
    }
}

/// In-memory store over a JSON file, ordered by product ID.
pub struct ProductStore {
    path: PathBuf,
    records: BTreeMap<String, ProductRecord>,
}

impl ProductStore {
    /// Loads the store, or starts empty when the file does not exist yet.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            debug!("Store file {} not found, starting empty", path.display());
            return Ok(Self { path, records: BTreeMap::new() });
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read store file: {}", path.display()))?;
        let list: Vec<ProductRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse store file: {}", path.display()))?;

        let records = list.into_iter().map(|r| (r.id.clone(), r)).collect();
        Ok(Self { path, records })
    }

    /// Writes the store back to its file, creating parent directories.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create store directory: {}", parent.display())
                })?;
            }
        }

        let list: Vec<&ProductRecord> = self.records.values().collect();
        let json = serde_json::to_string_pretty(&list).context("Failed to serialize store")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write store file: {}", self.path.display()))?;

        debug!("Store saved: {} ({} records)", self.path.display(), self.records.len());
        Ok(())
    }

    /// All records, ordered by ID.
    pub fn all(&self) -> Vec<&ProductRecord> {
        self.records.values().collect()
    }

    /// Records whose ID is in the given set, ordered by ID.
    pub fn filter_ids(&self, ids: &[String]) -> Vec<&ProductRecord> {
        self.records.values().filter(|r| ids.contains(&r.id)).collect()
    }

    pub fn get(&self, id: &str) -> Option<&ProductRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Creates or updates a record from an imported row. Existing scrape
    /// results survive re-imports. Returns true when the record is new.
    pub fn upsert_imported(&mut self, id: &str, ean: &str, name: &str) -> bool {
        match self.records.get_mut(id) {
            Some(record) => {
                record.ean = ean.to_string();
                record.original_name = name.to_string();
                false
            }
            None => {
                self.records.insert(id.to_string(), ProductRecord::new(id, ean, name));
                true
            }
        }
    }

    /// Stores a scrape outcome on a record, stamping the scrape time.
    pub fn apply_listing(&mut self, id: &str, listing: &Listing, when: DateTime<Utc>) {
        if let Some(record) = self.records.get_mut(id) {
            record.worten_name = listing.name.clone();
            record.worten_url = listing.url.clone();
            record.lowest_price = listing.price;
            record.seller_name = Some(listing.seller.clone());
            record.is_available = listing.available;
            record.scrape_error = listing.error.clone();
            record.last_scraped = Some(when);
        }
    }
}
