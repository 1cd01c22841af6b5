//! Console output formatting for listings and stored records.

use crate::config::OutputFormat;
use crate::store::ProductRecord;
use crate::worten::Listing;

/// Formats search results and store contents for the terminal.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single search result.
    pub fn format_listing(&self, listing: &Listing) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(listing).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => self.listing_table(listing),
        }
    }

    /// Formats stored product records.
    pub fn format_records(&self, records: &[&ProductRecord]) -> String {
        if records.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Table => "No products in store.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Table => self.records_table(records),
        }
    }

    fn listing_table(&self, listing: &Listing) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Name:      {}", listing.name.as_deref().unwrap_or("N/A")));
        lines.push(format!("URL:       {}", listing.url.as_deref().unwrap_or("N/A")));

        match listing.price {
            Some(price) => lines.push(format!("Price:     {:.2} EUR", price)),
            None => lines.push("Price:     N/A".to_string()),
        }

        lines.push(format!("Seller:    {}", listing.seller));
        lines.push(format!(
            "Stock:     {}",
            if listing.available { "Available" } else { "Unavailable" }
        ));

        if let Some(error) = &listing.error {
            lines.push(format!("Error:     {}", error));
        }

        lines.join("\n")
    }

    fn records_table(&self, records: &[&ProductRecord]) -> String {
        let id_width = 10;
        let price_width = 10;
        let avail_width = 5;
        let name_width = 50;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<id_width$}  {:>price_width$}  {:<avail_width$}  {}",
            "ID", "Price", "Avail", "Name"
        ));
        lines.push(format!(
            "{:-<id_width$}  {:-<price_width$}  {:-<avail_width$}  {:-<name_width$}",
            "", "", "", ""
        ));

        for record in records {
            let price_str = match record.lowest_price {
                Some(p) => format!("{:.2}", p),
                None => "N/A".to_string(),
            };

            let avail_str = if record.is_available { "Yes" } else { "No" };

            let name = record.worten_name.as_deref().unwrap_or(&record.original_name);
            let name = if name.chars().count() > name_width {
                let cut: String = name.chars().take(name_width - 3).collect();
                format!("{}...", cut)
            } else {
                name.to_string()
            };

            lines.push(format!(
                "{:<id_width$}  {:>price_width$}  {:<avail_width$}  {}",
                record.id, price_str, avail_str, name
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", records.len()));

        lines.join("\n")
    }
}
