//! Extraction from hydrated (script-rendered) page markup.

use crate::worten::models::Listing;
use crate::worten::selectors::{self, first_match, first_price, first_text};
use crate::worten::site;
use scraper::{ElementRef, Html};
use tracing::debug;

/// Walks the rendered-mode selector tables over a search-results document
/// and assembles a listing from the first product card.
pub struct DomExtractor {
    base_url: String,
}

impl DomExtractor {
    pub fn new() -> Self {
        Self::with_base_url(site::BASE_URL)
    }

    /// Uses a custom base URL for resolving relative hrefs (for testing).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    /// Extracts from a search-results document. Only the complete absence of
    /// a product card is fatal; missing fields are left empty.
    pub fn extract(&self, html: &str) -> Listing {
        let document = Html::parse_document(html);
        let root = document.root_element();

        let Some(card) = first_match(root, &selectors::rendered::CARD) else {
            return Listing::failed("no product element in rendered output");
        };
        debug!("product card found in rendered output");

        let url = self.card_url(card);
        let name = first_text(card, &selectors::rendered::NAME);
        let price = first_price(card, &selectors::rendered::PRICE);
        let seller = card_seller(card);

        Listing { name, url, price, seller, available: price.is_some(), error: None }
    }

    /// Extracts from a product page reached by direct redirect. The embedded
    /// JSON payload is tried by the orchestrator before this runs, so only
    /// the generic markup fallbacks remain here. The navigated-to URL is
    /// kept as the product URL.
    pub fn extract_product_page(&self, html: &str, url: &str) -> Listing {
        let document = Html::parse_document(html);
        let root = document.root_element();

        let name = first_text(root, &selectors::product_page::TITLE);
        let price = first_price(root, &selectors::product_page::PRICE);
        let seller = first_text(root, &selectors::product_page::SELLER)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| site::NAME.to_string());

        Listing {
            name,
            url: Some(url.to_string()),
            price,
            seller,
            available: price.is_some(),
            error: None,
        }
    }

    /// Product link: an anchor carrying the product path marker, else the
    /// first anchor as long as its href carries the marker.
    fn card_url(&self, card: ElementRef<'_>) -> Option<String> {
        selectors::rendered::LINK
            .iter()
            .find_map(|sel| {
                card.select(sel)
                    .next()
                    .and_then(|a| a.value().attr("href"))
                    .filter(|href| href.contains(site::CARD_LINK_PATH))
            })
            .map(|href| site::absolute_url(&self.base_url, href))
    }
}

impl Default for DomExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn card_seller(card: ElementRef<'_>) -> String {
    first_text(card, &selectors::rendered::SELLER)
        .map(|text| text.strip_prefix(site::SELLER_PREFIX).map(str::to_string).unwrap_or(text))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| site::NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn card_html(name: &str, href: &str, price: &str, seller: &str) -> String {
        format!(
            r#"<html><body>
                <article class="product-card">
                    <a href="{href}">
                        <h3 class="product-card__name-and-features">{name}</h3>
                    </a>
                    <span class="product-card__price">{price}</span>
                    <span class="product-card__seller">{seller}</span>
                </article>
            </body></html>"#
        )
    }

    #[test]
    fn test_extract_full_card() {
        let html = card_html("Widget Pro", "/produtos/widget-pro-123", "49,90€", "ACME Store");
        let listing = DomExtractor::new().extract(&html);
        assert_eq!(listing.name.as_deref(), Some("Widget Pro"));
        assert_eq!(listing.url.as_deref(), Some("https://www.worten.pt/produtos/widget-pro-123"));
        assert_eq!(listing.price, Some(Decimal::from_str("49.90").unwrap()));
        assert_eq!(listing.seller, "ACME Store");
        assert!(listing.available);
        assert!(listing.error.is_none());
    }

    #[test]
    fn test_extract_no_card_is_error_record() {
        let listing = DomExtractor::new().extract("<html><body><p>nada</p></body></html>");
        assert_eq!(listing.error.as_deref(), Some("no product element in rendered output"));
        assert!(!listing.available);
        assert!(!listing.is_acceptable());
    }

    #[test]
    fn test_extract_seller_prefix_stripped() {
        let html =
            card_html("Widget", "/produtos/widget", "10€", "Vendido por Loja Electrodomésticos");
        let listing = DomExtractor::new().extract(&html);
        assert_eq!(listing.seller, "Loja Electrodomésticos");
    }

    #[test]
    fn test_extract_seller_defaults_to_site() {
        let html = r#"<html><body>
            <article class="product-card">
                <a href="/produtos/w"><h3>Widget</h3></a>
            </article>
        </body></html>"#;
        let listing = DomExtractor::new().extract(html);
        assert_eq!(listing.seller, "Worten");
    }

    #[test]
    fn test_extract_missing_price_not_available() {
        let html = r#"<html><body>
            <article class="product-card">
                <a href="/produtos/w"><h3>Widget</h3></a>
            </article>
        </body></html>"#;
        let listing = DomExtractor::new().extract(html);
        assert!(listing.price.is_none());
        assert!(!listing.available);
        // Still acceptable: it has a URL.
        assert!(listing.is_acceptable());
    }

    #[test]
    fn test_extract_anchor_without_marker_ignored() {
        let html = r#"<html><body>
            <article class="product-card">
                <a href="/campanhas/promo"><h3>Widget</h3></a>
            </article>
        </body></html>"#;
        let listing = DomExtractor::new().extract(html);
        assert!(listing.url.is_none());
    }

    #[test]
    fn test_extract_unparseable_price_falls_through() {
        // The specific price class holds no number; a later table entry does.
        let html = r#"<html><body>
            <article class="product-card">
                <a href="/produtos/w"><h3>Widget</h3></a>
                <span class="product-card__price">desde</span>
                <div class="currentPrice">29,99€</div>
            </article>
        </body></html>"#;
        let listing = DomExtractor::new().extract(html);
        assert_eq!(listing.price, Some(Decimal::from_str("29.99").unwrap()));
    }

    #[test]
    fn test_extract_product_page_fallbacks() {
        let html = r#"<html><body>
            <h1>Widget Deluxe</h1>
            <div class="product-price">199,99€</div>
            <div class="product-seller">ACME</div>
        </body></html>"#;
        let listing = DomExtractor::new()
            .extract_product_page(html, "https://www.worten.pt/p/widget-deluxe");
        assert_eq!(listing.name.as_deref(), Some("Widget Deluxe"));
        assert_eq!(listing.url.as_deref(), Some("https://www.worten.pt/p/widget-deluxe"));
        assert_eq!(listing.price, Some(Decimal::from_str("199.99").unwrap()));
        assert_eq!(listing.seller, "ACME");
        assert!(listing.available);
    }

    #[test]
    fn test_extract_product_page_bare() {
        let listing = DomExtractor::new()
            .extract_product_page("<html><body></body></html>", "https://www.worten.pt/p/x");
        assert!(listing.name.is_none());
        assert!(listing.price.is_none());
        assert!(!listing.available);
        assert_eq!(listing.url.as_deref(), Some("https://www.worten.pt/p/x"));
    }

    #[test]
    fn test_custom_base_url() {
        let html = card_html("W", "/produtos/w", "5€", "X");
        let listing = DomExtractor::with_base_url("http://localhost:8080").extract(&html);
        assert_eq!(listing.url.as_deref(), Some("http://localhost:8080/produtos/w"));
    }
}
