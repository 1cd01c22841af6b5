//! Import command: input spreadsheet into the record store.

use crate::config::Config;
use crate::sheet;
use crate::store::ProductStore;
use anyhow::Result;
use tracing::info;

/// Outcome counts of an import run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Newly created records.
    pub imported: usize,
    /// Records that already existed and had identity fields refreshed.
    pub updated: usize,
}

/// Reads the input spreadsheet and creates or refreshes store records.
pub struct ImportCommand {
    config: Config,
}

impl ImportCommand {
    /// Creates a new import command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the import and refreshes the output spreadsheet.
    pub fn execute(&self) -> Result<ImportSummary> {
        let rows = sheet::read_input(&self.config.input_path)?;
        let mut store = ProductStore::load(&self.config.store_path)?;

        let mut summary = ImportSummary::default();
        for row in &rows {
            if store.upsert_imported(&row.id, &row.ean, &row.name) {
                summary.imported += 1;
            } else {
                summary.updated += 1;
            }
        }

        store.save()?;
        sheet::write_output(&self.config.output_path, &store.all())?;

        info!(
            "Imported {} new products, updated {} existing",
            summary.imported, summary.updated
        );
        Ok(summary)
    }
}
