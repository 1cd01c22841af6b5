//! Worten-specific modules: page fetching, extraction and search.

pub mod client;
pub mod dom;
pub mod html;
pub mod models;
pub mod page_data;
pub mod price;
pub mod search;
pub mod selectors;
pub mod site;
pub mod terms;

pub use client::{FetchError, FetchMode, FetchedPage, PageFetcher, WortenClient};
pub use dom::DomExtractor;
pub use html::HtmlExtractor;
pub use models::Listing;
pub use page_data::PageDataExtractor;
pub use search::{Extractor, SearchOrchestrator};
