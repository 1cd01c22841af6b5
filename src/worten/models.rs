//! Data model for extracted product listings.

use crate::worten::site;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Error messages are cut to this length before storage or display.
pub const MAX_ERROR_LEN: usize = 100;

/// Normalized result of one product search.
///
/// A listing is built once per extraction strategy and never mutated; the
/// orchestrator keeps the first acceptable one. `error` is only ever set on
/// failure paths, so `error.is_some()` implies `available == false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Product title as shown on the site.
    pub name: Option<String>,
    /// Absolute URL of the product page.
    pub url: Option<String>,
    /// Lowest price found; strictly positive when present.
    pub price: Option<Decimal>,
    /// Seller name, the site itself when no marketplace seller is shown.
    pub seller: String,
    /// True when a positive price was found and nothing marks it out of stock.
    pub available: bool,
    /// Failure description, truncated to [`MAX_ERROR_LEN`].
    pub error: Option<String>,
}

impl Listing {
    /// Empty record for a search that completed without finding the product.
    pub fn not_found() -> Self {
        Self {
            name: None,
            url: None,
            price: None,
            seller: site::NAME.to_string(),
            available: false,
            error: None,
        }
    }

    /// Error record for a failed attempt. The message is truncated.
    pub fn failed(message: impl AsRef<str>) -> Self {
        Self { error: Some(truncate_error(message.as_ref())), ..Self::not_found() }
    }

    /// A listing good enough to stop searching: it points somewhere or it
    /// confirms availability.
    pub fn is_acceptable(&self) -> bool {
        self.available || self.url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Bounds an error message to [`MAX_ERROR_LEN`] characters.
pub fn truncate_error(message: &str) -> String {
    if message.chars().count() > MAX_ERROR_LEN {
        message.chars().take(MAX_ERROR_LEN).collect()
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_not_found_defaults() {
        let listing = Listing::not_found();
        assert!(listing.name.is_none());
        assert!(listing.url.is_none());
        assert!(listing.price.is_none());
        assert_eq!(listing.seller, "Worten");
        assert!(!listing.available);
        assert!(listing.error.is_none());
        assert!(!listing.is_acceptable());
    }

    #[test]
    fn test_failed_sets_error_and_stays_unavailable() {
        let listing = Listing::failed("request timed out");
        assert_eq!(listing.error.as_deref(), Some("request timed out"));
        assert!(!listing.available);
        assert!(!listing.is_acceptable());
    }

    #[test]
    fn test_failed_truncates_long_messages() {
        let long = "x".repeat(300);
        let listing = Listing::failed(&long);
        assert_eq!(listing.error.unwrap().chars().count(), MAX_ERROR_LEN);
    }

    #[test]
    fn test_acceptable_with_url() {
        let listing = Listing {
            url: Some("https://www.worten.pt/p/widget".to_string()),
            ..Listing::not_found()
        };
        assert!(listing.is_acceptable());
    }

    #[test]
    fn test_acceptable_when_available() {
        let listing = Listing {
            price: Some(Decimal::from_str("9.99").unwrap()),
            available: true,
            ..Listing::not_found()
        };
        assert!(listing.is_acceptable());
    }

    #[test]
    fn test_empty_url_not_acceptable() {
        let listing = Listing { url: Some(String::new()), ..Listing::not_found() };
        assert!(!listing.is_acceptable());
    }

    #[test]
    fn test_truncate_error_multibyte() {
        let msg = "é".repeat(150);
        assert_eq!(truncate_error(&msg).chars().count(), MAX_ERROR_LEN);
    }

    #[test]
    fn test_listing_serde_roundtrip() {
        let listing = Listing {
            name: Some("Widget".to_string()),
            url: Some("https://www.worten.pt/p/widget".to_string()),
            price: Some(Decimal::from_str("49.90").unwrap()),
            seller: "ACME".to_string(),
            available: true,
            error: None,
        };
        let json = serde_json::to_string(&listing).unwrap();
        let parsed: Listing = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, listing);
    }
}
