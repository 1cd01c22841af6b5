//! Extraction from the JSON state blob embedded in Worten pages.
//!
//! The site is a Next.js app and ships its page state in a
//! `<script id="__NEXT_DATA__">` tag. When present, that payload is far more
//! reliable than scraping markup, so it is always the first strategy tried.

use crate::worten::models::Listing;
use crate::worten::site;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::trace;

const MARKER: &str = "<script id=\"__NEXT_DATA__\"";

/// Keys under `props.pageProps` that hold search-result collections.
const SEARCH_KEYS: &[&str] = &["searchData", "initialData", "data"];

/// Keys that hold the listing array inside a search section.
const LIST_KEYS: &[&str] = &["products", "items", "results"];

/// Keys under `props.pageProps` that hold a single product object.
const PRODUCT_KEYS: &[&str] = &["product", "productData"];

/// Nested `field.subfield` price locations, tried in order.
const NESTED_PRICE_KEYS: &[(&str, &str)] =
    &[("price", "value"), ("price", "current"), ("prices", "current")];

/// Flat price fields, tried after the nested ones.
const FLAT_PRICE_KEYS: &[&str] = &["currentPrice", "salePrice", "price"];

/// Extracts a listing from the embedded page-state JSON.
pub struct PageDataExtractor {
    base_url: String,
}

impl PageDataExtractor {
    pub fn new() -> Self {
        Self::with_base_url(site::BASE_URL)
    }

    /// Uses a custom base URL for resolving relative slugs (for testing).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    /// Returns `None` when no payload is present or it is not valid JSON;
    /// a payload whose product entry has an unexpected shape yields an
    /// error record instead, since that is worth surfacing.
    pub fn extract(&self, html: &str) -> Option<Listing> {
        let payload = payload_slice(html)?;
        let data: Value = serde_json::from_str(payload).ok()?;
        let props = data.pointer("/props/pageProps")?;

        // Search results: first listing of the first populated collection.
        for key in SEARCH_KEYS {
            let Some(section) = props.get(*key).filter(|v| non_empty(v)) else {
                continue;
            };
            for list_key in LIST_KEYS {
                if let Some(first) =
                    section.get(*list_key).and_then(Value::as_array).and_then(|a| a.first())
                {
                    trace!("page data listing found under {}.{}", key, list_key);
                    return Some(self.map_listing(first));
                }
            }
        }

        // Single product page.
        for key in PRODUCT_KEYS {
            if let Some(product) = props.get(*key).filter(|v| non_empty(v)) {
                trace!("page data product found under {}", key);
                return Some(self.map_listing(product));
            }
        }

        None
    }

    /// Maps one product object from the payload into a listing.
    fn map_listing(&self, item: &Value) -> Listing {
        let Some(obj) = item.as_object() else {
            return Listing::failed("unexpected product payload shape");
        };

        let name = ["name", "title"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_str))
            .filter(|s| !s.is_empty())
            .map(String::from);

        let url = ["slug", "url"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_str))
            .filter(|s| !s.is_empty())
            .map(|path| site::absolute_url(&self.base_url, path));

        let price = price_of(obj);
        let seller = seller_of(obj);

        // Missing stock flags count as in stock; only an explicit false on
        // both flags marks a priced listing unavailable.
        let in_stock = obj.get("available").and_then(Value::as_bool).unwrap_or(true)
            || obj.get("inStock").and_then(Value::as_bool).unwrap_or(true);
        let available = price.is_some() && in_stock;

        Listing { name, url, price, seller, available, error: None }
    }
}

impl Default for PageDataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the raw JSON between the marker's closing `>` and `</script>`.
fn payload_slice(html: &str) -> Option<&str> {
    let start = html.find(MARKER)?;
    let rest = &html[start..];
    let open = rest.find('>')? + 1;
    let end = rest[open..].find("</script>")?;
    Some(&rest[open..open + end])
}

/// First price field that parses to a positive decimal wins.
fn price_of(obj: &serde_json::Map<String, Value>) -> Option<Decimal> {
    for (field, sub) in NESTED_PRICE_KEYS {
        if let Some(value) = obj.get(*field).and_then(|v| v.get(*sub)) {
            if let Some(price) = decimal_of(value) {
                return Some(price);
            }
        }
    }
    for field in FLAT_PRICE_KEYS {
        if let Some(value) = obj.get(*field).filter(|v| !v.is_object()) {
            if let Some(price) = decimal_of(value) {
                return Some(price);
            }
        }
    }
    None
}

/// Accepts JSON numbers and numeric strings; anything else, or a
/// non-positive value, is absent.
fn decimal_of(value: &Value) -> Option<Decimal> {
    let parsed = match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }?;
    (parsed > Decimal::ZERO).then_some(parsed)
}

fn seller_of(obj: &serde_json::Map<String, Value>) -> String {
    obj.get("seller")
        .and_then(|s| s.get("name"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .unwrap_or_else(|| site::NAME.to_string())
}

/// Mirrors the "present and populated" check used when probing key paths.
fn non_empty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(m) => !m.is_empty(),
        Value::Array(a) => !a.is_empty(),
        _ => true,
    }
}
