//! Export command: record store to the output spreadsheet.

use crate::config::Config;
use crate::sheet;
use crate::store::ProductStore;
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Writes the current store contents to the output spreadsheet.
pub struct ExportCommand {
    config: Config,
}

impl ExportCommand {
    /// Creates a new export command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Writes the sheet and returns its path.
    pub fn execute(&self) -> Result<PathBuf> {
        let store = ProductStore::load(&self.config.store_path)?;
        sheet::write_output(&self.config.output_path, &store.all())?;

        info!("Exported {} products to {}", store.len(), self.config.output_path.display());
        Ok(self.config.output_path.clone())
    }
}
