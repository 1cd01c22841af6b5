//! HTTP client for Worten requests using wreq for TLS fingerprint emulation.
//!
//! The site sits behind Cloudflare; browser-grade TLS fingerprints and
//! headers get through where plain HTTP clients are challenged. Fetches are
//! surfaced through the [`PageFetcher`] trait so the search pipeline can be
//! driven by mocks, or by an alternative client that executes scripts.

use crate::worten::site;
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use wreq::Client;
use wreq_util::Emulation;

/// How the page content was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Scripts ran over the document; hydrated markup, lazy content present.
    Rendered,
    /// Plain HTTP body; server-rendered markup only.
    Static,
}

/// Result of fetching a search-results view.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL the request ended up at, after redirects.
    pub final_url: String,
    /// Page markup.
    pub body: String,
    /// Whether `body` is hydrated or static markup.
    pub mode: FetchMode,
}

/// Typed fetch failures. These never carry partial page content.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("blocked by bot protection (HTTP {0})")]
    Blocked(u16),

    #[error("challenge page detected")]
    Challenge,

    #[error("request failed with status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Request(#[from] wreq::Error),
}

/// Page-fetch capability consumed by the search pipeline.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the search-results view for a term. A search matching a
    /// single product may resolve directly to its product page; the final
    /// URL reflects that.
    async fn fetch_search(&self, term: &str) -> Result<FetchedPage, FetchError>;
}

/// Worten HTTP client with browser impersonation and anti-bot measures.
pub struct WortenClient {
    client: Client,
    delay_ms: u64,
    delay_jitter_ms: u64,
    base_url: Option<String>,
}

impl WortenClient {
    /// Creates a new client from the configuration.
    pub async fn new(config: &crate::config::Config) -> Result<Self, FetchError> {
        Self::with_base_url(config, None).await
    }

    /// Creates a new client with an optional custom base URL (for testing).
    pub async fn with_base_url(
        config: &crate::config::Config,
        base_url: Option<String>,
    ) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Routing requests through proxy {}", proxy_url);
            builder = builder.proxy(wreq::Proxy::all(proxy_url)?);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
            base_url,
        })
    }

    fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(site::BASE_URL)
    }

    /// One GET with browser emulation, preceded by the jittered pause.
    async fn get(&self, url: &str) -> Result<(String, String), FetchError> {
        self.pause().await;

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", site::ACCEPT_LANGUAGE)
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .header("Sec-Ch-Ua", "\"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\"")
            .header("Sec-Ch-Ua-Mobile", "?0")
            .header("Sec-Ch-Ua-Platform", "\"Windows\"")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await?;

        let status = response.status();
        debug!("{} -> {}", url, status);

        if status == 403 || status == 503 {
            warn!("Bot protection block ({}). Consider a proxy or a longer delay.", status);
            return Err(FetchError::Blocked(status.as_u16()));
        }

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.uri().to_string();
        let body = response.text().await?;

        if is_challenge_body(&body) {
            warn!("Challenge interstitial detected at {}", final_url);
            return Err(FetchError::Challenge);
        }

        Ok((final_url, body))
    }

    /// Request pacing: base delay plus random jitter, looks less scripted.
    async fn pause(&self) {
        if self.delay_ms == 0 {
            return;
        }

        let mut wait = self.delay_ms;
        if self.delay_jitter_ms > 0 {
            wait += rand::rng().random_range(0..=self.delay_jitter_ms);
        }

        debug!("Waiting {}ms before request", wait);
        tokio::time::sleep(Duration::from_millis(wait)).await;
    }
}

#[async_trait]
impl PageFetcher for WortenClient {
    async fn fetch_search(&self, term: &str) -> Result<FetchedPage, FetchError> {
        let url = format!(
            "{}{}?query={}",
            self.base_url(),
            site::SEARCH_PATH,
            urlencoding::encode(term)
        );

        info!("Searching: {}", term);
        let (final_url, body) = self.get(&url).await?;

        // No scripts ran over this body.
        Ok(FetchedPage { final_url, body, mode: FetchMode::Static })
    }
}

/// Cloudflare interstitials mention a challenge, or open with the
/// Portuguese "um momento" page title.
fn is_challenge_body(body: &str) -> bool {
    let lower = body.to_lowercase();
    if lower.contains("challenge") {
        return true;
    }
    let head: String = lower.chars().take(500).collect();
    head.contains("momento")
}
