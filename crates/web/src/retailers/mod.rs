//! Retailer scraping adapters.
//!
//! Each supported retailer gets a [`SiteAdapter`] that knows two things:
//! how to search its listing page and how to pull the price text off a
//! product page. The [`AdapterRegistry`] maps stored retailer tags to
//! adapters; tags without one (legacy `BJS`/`Etsy` rows, arbitrary text)
//! resolve to [`FetchError::NotSupported`], which callers treat as "leave
//! the stored data alone", not as a failure.
//!
//! Adding a retailer means writing an adapter module and registering it in
//! [`AdapterRegistry::new`]; nothing else dispatches on the tag.

pub mod amazon;
pub mod bestbuy;
pub mod driver;
pub mod ebay;
pub mod google;
pub mod target;
pub mod walmart;

pub use driver::{SearchDriver, SearchFilters, SearchSort};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopscout_core::Retailer;

/// Browser user agent sent with scraping requests. Retailer pages serve
/// bot-detected clients a stripped page with none of our selectors on it.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Per-request timeout for retailer pages.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// A product scraped from a retailer's listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedProduct {
    pub title: String,
    /// Price text exactly as the page showed it ("$12.50", "USD 10");
    /// empty when the listing had no price node.
    pub price: String,
    /// Absolute product page URL.
    pub link: String,
    pub website: Retailer,
    /// Rating text as shown ("4.5 out of 5 stars", "4.5"); empty when the
    /// listing had none.
    pub rating: String,
}

/// Errors from fetching or parsing retailer pages.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The retailer tag has no registered adapter.
    #[error("retailer not supported: {0}")]
    NotSupported(String),

    /// Network-level failure (DNS, connect, timeout, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The retailer answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(StatusCode),

    /// The page loaded but no price selector matched.
    #[error("no price found on page")]
    PriceNotFound,
}

impl FetchError {
    /// True when the failure means "no adapter for this tag" rather than a
    /// fetch problem.
    #[must_use]
    pub const fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported(_))
    }
}

/// A retailer-specific scraper.
///
/// Implementations must not hold [`scraper::Html`] across an await point;
/// parse in synchronous helpers after the body has been read.
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    /// The retailer this adapter scrapes.
    fn retailer(&self) -> Retailer;

    /// Fetch the current price text from a product page.
    async fn fetch_price(&self, client: &reqwest::Client, url: &str)
    -> Result<String, FetchError>;

    /// Search the retailer's listing page.
    async fn search(
        &self,
        client: &reqwest::Client,
        query: &str,
    ) -> Result<Vec<ScrapedProduct>, FetchError>;
}

/// Maps retailer tags to their adapters and owns the shared HTTP client.
pub struct AdapterRegistry {
    client: reqwest::Client,
    adapters: HashMap<Retailer, Arc<dyn SiteAdapter>>,
}

impl AdapterRegistry {
    /// Build the registry with every production adapter registered.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;

        let adapters: Vec<Arc<dyn SiteAdapter>> = vec![
            Arc::new(amazon::AmazonAdapter),
            Arc::new(google::GoogleShoppingAdapter),
            Arc::new(walmart::WalmartAdapter),
            Arc::new(ebay::EbayAdapter),
            Arc::new(bestbuy::BestBuyAdapter),
            Arc::new(target::TargetAdapter),
        ];

        Ok(Self::with_adapters(client, adapters))
    }

    /// Build a registry from explicit adapters. Test seam.
    #[must_use]
    pub fn with_adapters(
        client: reqwest::Client,
        adapters: Vec<Arc<dyn SiteAdapter>>,
    ) -> Self {
        let adapters = adapters
            .into_iter()
            .map(|adapter| (adapter.retailer(), adapter))
            .collect();

        Self { client, adapters }
    }

    /// Whether a retailer has a registered adapter.
    #[must_use]
    pub fn supports(&self, retailer: Retailer) -> bool {
        self.adapters.contains_key(&retailer)
    }

    /// Registered retailers in [`Retailer::ALL`] order.
    pub fn registered(&self) -> impl Iterator<Item = Retailer> + '_ {
        Retailer::ALL.into_iter().filter(|r| self.supports(*r))
    }

    /// Fetch the current price text for a stored retailer tag and link.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::NotSupported` for tags without an adapter, or
    /// the adapter's fetch failure.
    pub async fn fetch_price(&self, website: &str, url: &str) -> Result<String, FetchError> {
        let adapter = Retailer::parse(website)
            .and_then(|r| self.adapters.get(&r))
            .ok_or_else(|| FetchError::NotSupported(website.to_string()))?;

        adapter.fetch_price(&self.client, url).await
    }

    /// Search one retailer's listings.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::NotSupported` for retailers without an adapter,
    /// or the adapter's fetch failure.
    pub async fn search(
        &self,
        retailer: Retailer,
        query: &str,
    ) -> Result<Vec<ScrapedProduct>, FetchError> {
        let adapter = self
            .adapters
            .get(&retailer)
            .ok_or_else(|| FetchError::NotSupported(retailer.as_str().to_string()))?;

        adapter.search(&self.client, query).await
    }
}

/// GET a page and return its body, mapping non-success statuses to errors.
pub(crate) async fn fetch_html(
    client: &reqwest::Client,
    url: &str,
) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    Ok(response.text().await?)
}

/// First non-empty text content matched by any of the selectors, in order.
///
/// Selectors are compile-time constants; a malformed one is skipped rather
/// than panicking.
pub(crate) fn first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        for node in document.select(&selector) {
            let text = collapse_whitespace(&node.text().collect::<String>());
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// First non-empty text under `scope` matched by any selector, in order.
pub(crate) fn first_text_in(scope: &scraper::ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        for node in scope.select(&selector) {
            let text = collapse_whitespace(&node.text().collect::<String>());
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// First `href` attribute under `scope` matched by any selector, in order.
pub(crate) fn first_href_in(scope: &scraper::ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        if let Some(href) = scope
            .select(&selector)
            .find_map(|node| node.value().attr("href"))
        {
            let href = href.trim();
            if !href.is_empty() {
                return Some(href.to_string());
            }
        }
    }
    None
}

/// Resolve a possibly-relative href against a retailer's origin.
///
/// Absolute and scheme-relative hrefs pass through; anything the URL
/// parser rejects is returned unchanged rather than dropped.
pub(crate) fn absolute_url(origin: &str, href: &str) -> String {
    url::Url::parse(origin)
        .and_then(|base| base.join(href))
        .map_or_else(|_| href.to_string(), |resolved| resolved.to_string())
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
