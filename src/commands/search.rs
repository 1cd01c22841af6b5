//! Search command: one ad-hoc query against the site.

use crate::config::Config;
use crate::format::Formatter;
use crate::worten::{PageFetcher, SearchOrchestrator, WortenClient};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

/// Executes a single product search and formats the result.
pub struct SearchCommand {
    config: Config,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the search and returns formatted output.
    pub async fn execute(&self, query: &str) -> Result<String> {
        let client =
            WortenClient::new(&self.config).await.context("Failed to create HTTP client")?;
        let orchestrator = SearchOrchestrator::new(client)
            .with_term_delay(Duration::from_millis(self.config.term_delay_ms));

        self.execute_with_orchestrator(&orchestrator, query).await
    }

    /// Executes the search with a provided orchestrator (for testing).
    pub async fn execute_with_orchestrator<F: PageFetcher>(
        &self,
        orchestrator: &SearchOrchestrator<F>,
        query: &str,
    ) -> Result<String> {
        info!("Searching for: {}", query);

        let listing = orchestrator.search(query, None).await;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_listing(&listing))
    }
}
