//! Spreadsheet reading and writing for product data.
//!
//! The input sheet carries `ID`, `EAN` and `Name` columns; the output sheet
//! uses the fixed Portuguese column set consumed downstream. Files are CSV;
//! output gets a UTF-8 BOM so Excel opens accented names correctly.

use crate::store::ProductRecord;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Output column order. Downstream consumers rely on it.
pub const OUTPUT_COLUMNS: [&str; 10] = [
    "ID",
    "EAN",
    "Nome Original",
    "Nome Worten",
    "Link Worten",
    "Menor Preco",
    "Vendedor",
    "Disponivel",
    "Ultima Atualizacao",
    "Erro",
];

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the input sheet.
#[derive(Debug, Clone, Deserialize)]
pub struct InputRow {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(rename = "EAN", default)]
    pub ean: String,
    #[serde(rename = "Name", default)]
    pub name: String,
}

/// Reads the input sheet. Rows without an ID are dropped.
pub fn read_input(path: impl AsRef<Path>) -> Result<Vec<InputRow>> {
    let path = path.as_ref();
    if !path.exists() {
        bail!("Input spreadsheet not found: {}", path.display());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open input spreadsheet: {}", path.display()))?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: InputRow = result
            .with_context(|| format!("Failed to read row from {}", path.display()))?;
        if !row.id.is_empty() {
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Writes the output sheet for the given records.
pub fn write_output(path: impl AsRef<Path>, records: &[&ProductRecord]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    let mut file = File::create(path)
        .with_context(|| format!("Failed to create output spreadsheet: {}", path.display()))?;
    // BOM keeps Excel from mangling UTF-8.
    file.write_all(b"\xEF\xBB\xBF").context("Failed to write BOM")?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(OUTPUT_COLUMNS).context("Failed to write header")?;

    for record in records {
        writer
            .write_record(output_row(record))
            .with_context(|| format!("Failed to write row for product {}", record.id))?;
    }

    writer.flush().context("Failed to flush output spreadsheet")?;
    Ok(())
}

fn output_row(record: &ProductRecord) -> [String; 10] {
    [
        record.id.clone(),
        record.ean.clone(),
        record.original_name.clone(),
        record.worten_name.clone().unwrap_or_default(),
        record.worten_url.clone().unwrap_or_default(),
        record.lowest_price.map(|p| format!("{:.2}", p.round_dp(2))).unwrap_or_default(),
        record.seller_name.clone().unwrap_or_default(),
        if record.is_available { "Sim" } else { "Nao" }.to_string(),
        record.last_scraped.map(|t| t.format(DATE_FORMAT).to_string()).unwrap_or_default(),
        record.scrape_error.clone().unwrap_or_default(),
    ]
}
