//! CSS selectors for Worten page extraction.
//!
//! Every field is looked up through an ordered selector list: most specific
//! structural selectors first, generic attribute-substring selectors last,
//! first hit wins. Update this file when the site changes its markup.

use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

fn parse_all(sources: &[&str]) -> Vec<Selector> {
    sources.iter().map(|s| Selector::parse(s).unwrap()).collect()
}

/// Selectors for hydrated (script-rendered) search results.
pub mod rendered {
    use super::*;

    /// Product card container.
    pub static CARD: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        parse_all(&[
            "article.product-card",
            ".product-card",
            "[data-testid='product-card']",
            "article[itemtype*='Product']",
        ])
    });

    /// Product link inside a card.
    pub static LINK: LazyLock<Vec<Selector>> =
        LazyLock::new(|| parse_all(&["a[href*='/produtos/']", "a"]));

    /// Product name inside a card.
    pub static NAME: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        parse_all(&[".product-card__name-and-features", "h3", "h2", "[class*='name']"])
    });

    /// Price inside a card.
    pub static PRICE: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        parse_all(&[".product-card__price", "[class*='price']", "[class*='Price']"])
    });

    /// Marketplace seller inside a card.
    pub static SELLER: LazyLock<Vec<Selector>> =
        LazyLock::new(|| parse_all(&[".product-card__seller", "[class*='seller']"]));
}

/// Selectors for server-rendered static markup. Lazy-loaded content never
/// appears here, so the lists are the smaller server-side subset.
pub mod static_html {
    use super::*;

    /// Product card container.
    pub static CARD: LazyLock<Vec<Selector>> =
        LazyLock::new(|| parse_all(&["[data-testid='product-card']", ".product-card", "article"]));

    /// Product link inside a card.
    pub static LINK: LazyLock<Vec<Selector>> =
        LazyLock::new(|| parse_all(&["a[href*='/p/']", "a"]));

    /// Product name inside a card.
    pub static NAME: LazyLock<Vec<Selector>> =
        LazyLock::new(|| parse_all(&["h3", "h2", "[class*='name']"]));

    /// Price inside a card.
    pub static PRICE: LazyLock<Vec<Selector>> =
        LazyLock::new(|| parse_all(&["[class*='price']", "span"]));

    /// Marketplace seller inside a card.
    pub static SELLER: LazyLock<Vec<Selector>> = LazyLock::new(|| parse_all(&["[class*='seller']"]));
}

/// Selectors for a single product page (direct navigation).
pub mod product_page {
    use super::*;

    /// Product title.
    pub static TITLE: LazyLock<Vec<Selector>> = LazyLock::new(|| parse_all(&["h1"]));

    /// Current price.
    pub static PRICE: LazyLock<Vec<Selector>> =
        LazyLock::new(|| parse_all(&["[class*='price']", "span[class*='Price']"]));

    /// Seller block.
    pub static SELLER: LazyLock<Vec<Selector>> = LazyLock::new(|| parse_all(&["[class*='seller']"]));
}

/// Returns the first element matched by the first selector that hits.
pub fn first_match<'a>(root: ElementRef<'a>, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|sel| root.select(sel).next())
}

/// Returns the first non-empty trimmed text found by the selector list.
pub fn first_text(root: ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|sel| {
        root.select(sel).next().and_then(|e| {
            let text = e.text().collect::<String>().trim().to_string();
            (!text.is_empty()).then_some(text)
        })
    })
}

/// Runs each selector's text through the price parser; the first selector
/// whose text parses wins, unparseable hits fall through to the next one.
pub fn first_price(
    root: ElementRef<'_>,
    selectors: &[Selector],
) -> Option<rust_decimal::Decimal> {
    selectors.iter().find_map(|sel| {
        root.select(sel)
            .next()
            .and_then(|e| crate::worten::price::parse_price(&e.text().collect::<String>()))
    })
}
