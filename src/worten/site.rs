//! Worten.pt site constants.

/// Display name of the store, also the default seller.
pub const NAME: &str = "Worten";

/// Base URL all relative product paths are resolved against.
pub const BASE_URL: &str = "https://www.worten.pt";

/// Path of the search endpoint (takes a `query` parameter).
pub const SEARCH_PATH: &str = "/search";

/// URL-path marker identifying a product page. Searches that match a single
/// product redirect straight to one of these.
pub const PRODUCT_PATH: &str = "/p/";

/// Href marker used by product links inside hydrated result cards.
pub const CARD_LINK_PATH: &str = "/produtos/";

/// Accept-Language sent with every request.
pub const ACCEPT_LANGUAGE: &str = "pt-PT,pt;q=0.9,en-US;q=0.8,en;q=0.7";

/// Lowercase body fragments that mean the search returned nothing.
pub const NO_RESULTS_MARKERS: &[&str] = &["sem resultados", "nenhum resultado"];

/// Prefix the site puts in front of marketplace seller names.
pub const SELLER_PREFIX: &str = "Vendido por ";

/// Resolves a possibly-relative path against the site base URL.
pub fn absolute_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http") {
        path.to_string()
    } else {
        format!("{}{}", base_url, path)
    }
}
