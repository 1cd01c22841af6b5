//! Search orchestration: term candidates, strategy fallback, containment.

use crate::worten::client::{FetchMode, FetchedPage, PageFetcher};
use crate::worten::dom::DomExtractor;
use crate::worten::html::HtmlExtractor;
use crate::worten::models::{truncate_error, Listing};
use crate::worten::page_data::PageDataExtractor;
use crate::worten::site;
use crate::worten::terms::plan_terms;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One extraction strategy over a fetched page. Strategies either produce a
/// listing (possibly an error record) or decline with `None`; they never
/// fail outward.
pub trait Extractor {
    fn extract(&self, page: &FetchedPage) -> Option<Listing>;
}

impl Extractor for PageDataExtractor {
    fn extract(&self, page: &FetchedPage) -> Option<Listing> {
        PageDataExtractor::extract(self, &page.body)
    }
}

impl Extractor for DomExtractor {
    fn extract(&self, page: &FetchedPage) -> Option<Listing> {
        Some(DomExtractor::extract(self, &page.body))
    }
}

impl Extractor for HtmlExtractor {
    fn extract(&self, page: &FetchedPage) -> Option<Listing> {
        Some(HtmlExtractor::extract(self, &page.body))
    }
}

/// Drives search terms through the page fetcher and the extraction
/// strategies, returning the first acceptable listing.
///
/// `search` always returns a listing: fetch and extraction failures are
/// contained per attempt and at worst shape the terminal record.
pub struct SearchOrchestrator<F: PageFetcher> {
    fetcher: F,
    page_data: PageDataExtractor,
    dom: DomExtractor,
    html: HtmlExtractor,
    term_delay: Duration,
}

impl<F: PageFetcher> SearchOrchestrator<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            page_data: PageDataExtractor::new(),
            dom: DomExtractor::new(),
            html: HtmlExtractor::new(),
            term_delay: Duration::from_millis(500),
        }
    }

    /// Overrides the pause between term attempts (zero for tests).
    pub fn with_term_delay(mut self, delay: Duration) -> Self {
        self.term_delay = delay;
        self
    }

    /// Uses a custom base URL in all extractors (for testing).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.page_data = PageDataExtractor::with_base_url(base_url);
        self.dom = DomExtractor::with_base_url(base_url);
        self.html = HtmlExtractor::with_base_url(base_url);
        self
    }

    /// Searches for a product by name. The barcode is accepted for callers
    /// that track one, but EAN queries rarely match on the site, so term
    /// planning works from the name alone.
    pub async fn search(&self, product_name: &str, barcode: Option<&str>) -> Listing {
        let _ = barcode;

        let terms = plan_terms(product_name);
        if terms.is_empty() {
            return Listing::failed("no search term provided");
        }

        let mut last_error: Option<String> = None;

        for (i, term) in terms.iter().enumerate() {
            debug!("Trying term {}/{}: {}", i + 1, terms.len(), term);

            let listing = self.attempt(term).await;
            if listing.is_acceptable() {
                info!("Found listing for '{}' via term '{}'", product_name, term);
                return listing;
            }
            if let Some(error) = listing.error {
                last_error = Some(error);
            }

            if i + 1 < terms.len() && !self.term_delay.is_zero() {
                tokio::time::sleep(self.term_delay).await;
            }
        }

        match last_error {
            Some(error) => Listing::failed(error),
            None => {
                info!("No listing found for '{}'", product_name);
                Listing::not_found()
            }
        }
    }

    /// Runs one term through fetch, redirect handling and the strategy
    /// chain. Always yields a listing; fetch errors become error records.
    async fn attempt(&self, term: &str) -> Listing {
        let page = match self.fetcher.fetch_search(term).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Fetch failed for '{}': {}", term, e);
                return Listing::failed(truncate_error(&e.to_string()));
            }
        };

        // A single-match search redirects straight to the product page.
        if page.final_url.contains(site::PRODUCT_PATH) {
            debug!("Search redirected to product page: {}", page.final_url);
            let listing = self.product_page_listing(&page);
            if listing.name.is_some() || listing.price.is_some() {
                return listing;
            }
            return Listing::not_found();
        }

        if has_no_results_marker(&page.body) {
            debug!("No-results page for '{}'", term);
            return Listing::not_found();
        }

        let mut outcome = Listing::not_found();
        for extractor in self.strategies(page.mode) {
            match extractor.extract(&page) {
                Some(listing) if listing.is_acceptable() => return listing,
                Some(listing) => outcome = listing,
                None => {}
            }
        }
        outcome
    }

    /// Extraction order for a fetch mode: the embedded JSON payload first,
    /// then the markup extractor matching how the page was produced.
    fn strategies(&self, mode: FetchMode) -> [&dyn Extractor; 2] {
        match mode {
            FetchMode::Rendered => [&self.page_data as &dyn Extractor, &self.dom],
            FetchMode::Static => [&self.page_data as &dyn Extractor, &self.html],
        }
    }

    /// Product-page extraction: the embedded payload when it names the
    /// product (keeping the navigated-to URL), markup fallbacks otherwise.
    fn product_page_listing(&self, page: &FetchedPage) -> Listing {
        if let Some(listing) = self.page_data.extract(&page.body) {
            if listing.name.is_some() {
                return Listing { url: Some(page.final_url.clone()), ..listing };
            }
        }
        self.dom.extract_product_page(&page.body, &page.final_url)
    }
}

fn has_no_results_marker(body: &str) -> bool {
    let lower = body.to_lowercase();
    site::NO_RESULTS_MARKERS.iter().any(|marker| lower.contains(marker))
}
