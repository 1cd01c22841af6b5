//! Scrape command: batch search over the record store.

use crate::config::Config;
use crate::sheet;
use crate::store::ProductStore;
use crate::worten::{PageFetcher, SearchOrchestrator, WortenClient};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::time::Duration;
use tracing::{info, warn};

/// Outcome counts of a scrape run. Produced even when individual products
/// fail; only a client that cannot be built at all aborts the batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeSummary {
    /// Products processed.
    pub scraped: usize,
    /// Products found with an available listing.
    pub found: usize,
    /// Products that completed cleanly without a match.
    pub not_found: usize,
    /// Products whose search ended in an error record.
    pub errors: usize,
}

/// Runs the search pipeline over stored products and persists the results.
pub struct ScrapeCommand {
    config: Config,
}

impl ScrapeCommand {
    /// Creates a new scrape command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Scrapes the given product IDs, or every stored product when empty.
    pub async fn execute(&self, ids: &[String]) -> Result<ScrapeSummary> {
        let client =
            WortenClient::new(&self.config).await.context("Failed to create HTTP client")?;
        let orchestrator = SearchOrchestrator::new(client)
            .with_term_delay(Duration::from_millis(self.config.term_delay_ms));

        self.execute_with_orchestrator(&orchestrator, ids).await
    }

    /// Runs the batch with a provided orchestrator (for testing).
    pub async fn execute_with_orchestrator<F: PageFetcher>(
        &self,
        orchestrator: &SearchOrchestrator<F>,
        ids: &[String],
    ) -> Result<ScrapeSummary> {
        let mut store = ProductStore::load(&self.config.store_path)?;

        let mut targets: Vec<(String, String, String)> = {
            let records = if ids.is_empty() { store.all() } else { store.filter_ids(ids) };
            records.iter().map(|r| (r.id.clone(), r.original_name.clone(), r.ean.clone())).collect()
        };
        if self.config.limit > 0 {
            targets.truncate(self.config.limit);
        }

        if targets.is_empty() {
            bail!("No products to scrape. Import the input spreadsheet first.");
        }

        let total = targets.len();
        let mut summary = ScrapeSummary::default();

        for (i, (id, name, ean)) in targets.iter().enumerate() {
            info!("[{}/{}] {}", i + 1, total, short_name(name));

            let barcode = (!ean.is_empty()).then_some(ean.as_str());
            let listing = orchestrator.search(name, barcode).await;

            store.apply_listing(id, &listing, Utc::now());
            summary.scraped += 1;

            if listing.available {
                summary.found += 1;
                let price = listing
                    .price
                    .map(|p| format!("{:.2}€", p))
                    .unwrap_or_else(|| "N/A".to_string());
                info!("  -> {} ({})", price, listing.seller);
            } else if let Some(error) = &listing.error {
                summary.errors += 1;
                warn!("  -> {}", error);
            } else {
                summary.not_found += 1;
                info!("  -> not found");
            }

            if i + 1 < total && self.config.scrape_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.scrape_delay_ms)).await;
            }
        }

        store.save()?;
        sheet::write_output(&self.config.output_path, &store.all())?;

        info!(
            "Scrape finished: {} found, {} not found, {} errors",
            summary.found, summary.not_found, summary.errors
        );
        Ok(summary)
    }
}

/// Progress lines keep names to a readable length.
fn short_name(name: &str) -> String {
    if name.chars().count() > 50 {
        let cut: String = name.chars().take(50).collect();
        format!("{}...", cut)
    } else {
        name.to_string()
    }
}
