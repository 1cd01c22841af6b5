//! Extraction from server-rendered static markup.
//!
//! Same field policy as the rendered-mode extractor, but no script ever ran
//! over this markup, so the selector tables are the smaller server-side
//! subset and lazy-loaded content is never expected.

use crate::worten::models::Listing;
use crate::worten::selectors::{self, first_match, first_price, first_text};
use crate::worten::site;
use scraper::{ElementRef, Html};

/// Walks the static-mode selector tables over plain fetched HTML.
pub struct HtmlExtractor {
    base_url: String,
}

impl HtmlExtractor {
    pub fn new() -> Self {
        Self::with_base_url(site::BASE_URL)
    }

    /// Uses a custom base URL for resolving relative hrefs (for testing).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    /// Extracts from a static search-results page. Missing fields are left
    /// empty; only a missing card is fatal to the attempt.
    pub fn extract(&self, html: &str) -> Listing {
        let document = Html::parse_document(html);
        let root = document.root_element();

        let Some(card) = first_match(root, &selectors::static_html::CARD) else {
            return Listing::failed("no product element in static markup");
        };

        let url = self.card_url(card);
        let name = first_text(card, &selectors::static_html::NAME);
        let price = first_price(card, &selectors::static_html::PRICE);
        let seller = card_seller(card);

        Listing { name, url, price, seller, available: price.is_some(), error: None }
    }

    /// Product link: the product-path anchor, else the first anchor on the
    /// card whatever its target.
    fn card_url(&self, card: ElementRef<'_>) -> Option<String> {
        selectors::static_html::LINK
            .iter()
            .find_map(|sel| card.select(sel).next().and_then(|a| a.value().attr("href")))
            .map(|href| site::absolute_url(&self.base_url, href))
    }
}

impl Default for HtmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn card_seller(card: ElementRef<'_>) -> String {
    first_text(card, &selectors::static_html::SELLER)
        .map(|text| text.strip_prefix(site::SELLER_PREFIX).map(str::to_string).unwrap_or(text))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| site::NAME.to_string())
}
