//! Cross-retailer search driver.
//!
//! Runs one query against every registered adapter in a stable order,
//! merges the rows, then applies sort, limit, and display-currency
//! conversion. A retailer that errors is skipped with a warning; the
//! driver itself never fails.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;
use tracing::warn;

use shopscout_core::{CurrencyCode, Retailer, parse_amount};

use super::{AdapterRegistry, ScrapedProduct};
use crate::services::currency::CurrencyService;

/// CSV header for exported search results.
const CSV_HEADER: [&str; 5] = ["Sr No.", "Title", "Link", "Rating", "Price"];

/// Errors from assembling search output.
///
/// The scraping itself is best-effort and cannot fail; these cover the
/// request shape and the export encoding.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The request carried no product name.
    #[error("product name is required")]
    MissingQuery,

    /// CSV serialization failure during export.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The CSV buffer could not be finalized.
    #[error("csv buffer error: {0}")]
    CsvBuffer(String),
}

/// Sort orders offered by the filter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchSort {
    /// Keep retailer order.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    RatingAsc,
    RatingDesc,
}

impl SearchSort {
    /// Parse a form value. `"default"`, unknown values, and absence all
    /// mean no sorting.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("price-asc") => Self::PriceAsc,
            Some("price-desc") => Self::PriceDesc,
            Some("rating-asc") => Self::RatingAsc,
            Some("rating-desc") => Self::RatingDesc,
            _ => Self::Default,
        }
    }

    /// The form tag for this sort.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::RatingAsc => "rating-asc",
            Self::RatingDesc => "rating-desc",
        }
    }
}

/// Numeric bounds from the filter form. `None` means no bound.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SearchFilters {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_rating: Option<f64>,
}

impl SearchFilters {
    /// True when no bound is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.min_price.is_none() && self.max_price.is_none() && self.min_rating.is_none()
    }

    /// Whether a product passes the bounds.
    ///
    /// A product without a parseable price or rating fails only the bounds
    /// that are actually set; with no bounds everything passes.
    #[must_use]
    pub fn matches(&self, product: &ScrapedProduct) -> bool {
        if self.min_price.is_some() || self.max_price.is_some() {
            let Some(amount) = parse_amount(&product.price) else {
                return false;
            };
            if self.min_price.is_some_and(|min| amount < min) {
                return false;
            }
            if self.max_price.is_some_and(|max| amount > max) {
                return false;
            }
        }

        if let Some(min_rating) = self.min_rating {
            let Some(rating) = parse_rating(&product.rating) else {
                return false;
            };
            if rating < min_rating {
                return false;
            }
        }

        true
    }

    /// Keep only products passing the bounds.
    #[must_use]
    pub fn apply(&self, products: Vec<ScrapedProduct>) -> Vec<ScrapedProduct> {
        if self.is_empty() {
            return products;
        }
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}

/// Options controlling one driver run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Display currency; `None` or USD leaves prices as scraped.
    pub currency: Option<CurrencyCode>,
    /// Cap on merged results, applied after sorting.
    pub limit: Option<usize>,
    pub sort: SearchSort,
    /// Restrict the run to one retailer.
    pub website: Option<Retailer>,
}

/// Runs queries across the registered retailers.
pub struct SearchDriver<'a> {
    registry: &'a AdapterRegistry,
    currency: &'a CurrencyService,
}

impl<'a> SearchDriver<'a> {
    #[must_use]
    pub const fn new(registry: &'a AdapterRegistry, currency: &'a CurrencyService) -> Self {
        Self { registry, currency }
    }

    /// Run the search.
    ///
    /// Retailers are queried one at a time; scraping is unfriendly enough
    /// without hitting six sites concurrently from one IP. Failures are
    /// logged and skipped.
    pub async fn run(&self, query: &str, options: SearchOptions) -> Vec<ScrapedProduct> {
        let mut products = Vec::new();

        for retailer in self.registry.registered() {
            if options.website.is_some_and(|only| only != retailer) {
                continue;
            }

            match self.registry.search(retailer, query).await {
                Ok(mut results) => {
                    tracing::debug!(
                        retailer = %retailer,
                        count = results.len(),
                        "retailer search finished"
                    );
                    products.append(&mut results);
                }
                Err(err) => {
                    warn!(retailer = %retailer, error = %err, "retailer search failed, skipping");
                }
            }
        }

        sort_products(&mut products, options.sort);

        if let Some(limit) = options.limit {
            products.truncate(limit);
        }

        if let Some(currency) = options.currency {
            self.convert_prices(&mut products, currency).await;
        }

        products
    }

    /// Rewrite each price into the display currency.
    ///
    /// Scraped prices are dollar-denominated; a price that doesn't parse or
    /// whose rate is unavailable stays as scraped.
    async fn convert_prices(&self, products: &mut [ScrapedProduct], currency: CurrencyCode) {
        if currency == CurrencyCode::USD {
            return;
        }

        for product in products.iter_mut() {
            let Some(amount) = parse_amount(&product.price) else {
                continue;
            };
            match self
                .currency
                .convert(amount, CurrencyCode::USD.as_str(), currency.as_str())
                .await
            {
                Ok(converted) => product.price = converted.round_dp(2).to_string(),
                Err(err) => {
                    warn!(error = %err, currency = %currency, "price conversion failed, keeping original");
                }
            }
        }
    }
}

/// Extract a numeric rating from free-form rating text.
///
/// `"4.6 out of 5 stars"` → `4.6`; empty or non-numeric text → `None`.
#[must_use]
pub fn parse_rating(text: &str) -> Option<f64> {
    parse_amount(text).and_then(|d| d.to_f64())
}

/// Stable sort; products the key doesn't parse for go last in either
/// direction.
fn sort_products(products: &mut [ScrapedProduct], sort: SearchSort) {
    match sort {
        SearchSort::Default => {}
        SearchSort::PriceAsc => {
            products.sort_by(|a, b| {
                cmp_missing_last(parse_amount(&a.price), parse_amount(&b.price), false)
            });
        }
        SearchSort::PriceDesc => {
            products.sort_by(|a, b| {
                cmp_missing_last(parse_amount(&a.price), parse_amount(&b.price), true)
            });
        }
        SearchSort::RatingAsc => {
            products.sort_by(|a, b| {
                cmp_missing_last(parse_rating(&a.rating), parse_rating(&b.rating), false)
            });
        }
        SearchSort::RatingDesc => {
            products.sort_by(|a, b| {
                cmp_missing_last(parse_rating(&a.rating), parse_rating(&b.rating), true)
            });
        }
    }
}

fn cmp_missing_last<T: PartialOrd>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            if descending { ord.reverse() } else { ord }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Serialize search results as CSV.
///
/// Layout: `Sr No.,Title,Link,Rating,Price`; rows are numbered from 1 and
/// an empty rating renders as `N/A`. When `rate` is given, every parseable
/// price is multiplied by it and written with two decimals; empty prices
/// stay empty.
pub fn to_csv(products: &[ScrapedProduct], rate: Option<Decimal>) -> Result<Vec<u8>, SearchError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for (index, product) in products.iter().enumerate() {
        let serial = (index + 1).to_string();
        let price = match (rate, parse_amount(&product.price)) {
            (Some(rate), Some(amount)) => (amount * rate).round_dp(2).to_string(),
            _ => product.price.clone(),
        };
        let rating = if product.rating.is_empty() {
            "N/A"
        } else {
            product.rating.as_str()
        };

        writer.write_record([
            serial.as_str(),
            product.title.as_str(),
            product.link.as_str(),
            rating,
            price.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| SearchError::CsvBuffer(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::retailers::{FetchError, SiteAdapter};
    use crate::services::currency::{CurrencyError, RateProvider};

    struct FixedAdapter {
        retailer: Retailer,
        results: Vec<ScrapedProduct>,
    }

    #[async_trait]
    impl SiteAdapter for FixedAdapter {
        fn retailer(&self) -> Retailer {
            self.retailer
        }

        async fn fetch_price(
            &self,
            _client: &reqwest::Client,
            _url: &str,
        ) -> Result<String, FetchError> {
            Err(FetchError::PriceNotFound)
        }

        async fn search(
            &self,
            _client: &reqwest::Client,
            _query: &str,
        ) -> Result<Vec<ScrapedProduct>, FetchError> {
            Ok(self.results.clone())
        }
    }

    struct NoRates;

    #[async_trait]
    impl RateProvider for NoRates {
        async fn fetch_rates(
            &self,
            _base: &str,
        ) -> Result<HashMap<String, Decimal>, CurrencyError> {
            Ok(HashMap::new())
        }
    }

    fn product(title: &str, price: &str, rating: &str) -> ScrapedProduct {
        ScrapedProduct {
            title: title.to_string(),
            price: price.to_string(),
            link: format!("https://example.com/{title}"),
            website: Retailer::Amazon,
            rating: rating.to_string(),
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_sort_parse_tags() {
        assert_eq!(SearchSort::parse(Some("price-asc")), SearchSort::PriceAsc);
        assert_eq!(SearchSort::parse(Some("default")), SearchSort::Default);
        assert_eq!(SearchSort::parse(Some("bogus")), SearchSort::Default);
        assert_eq!(SearchSort::parse(None), SearchSort::Default);
    }

    #[test]
    fn test_parse_rating_variants() {
        assert_eq!(parse_rating("4.6 out of 5 stars"), Some(4.6));
        assert_eq!(parse_rating("4.5"), Some(4.5));
        assert_eq!(parse_rating(""), None);
        assert_eq!(parse_rating("No reviews"), None);
    }

    #[test]
    fn test_sort_price_asc_puts_unpriced_last() {
        let mut products = vec![
            product("b", "$20.00", ""),
            product("c", "", ""),
            product("a", "$10.00", ""),
        ];
        sort_products(&mut products, SearchSort::PriceAsc);

        let titles: Vec<_> = products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_price_desc_still_puts_unpriced_last() {
        let mut products = vec![
            product("c", "", ""),
            product("a", "$10.00", ""),
            product("b", "$20.00", ""),
        ];
        sort_products(&mut products, SearchSort::PriceDesc);

        let titles: Vec<_> = products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_sort_rating_desc() {
        let mut products = vec![
            product("low", "$1", "3.1 out of 5 stars"),
            product("high", "$1", "4.9 out of 5 stars"),
        ];
        sort_products(&mut products, SearchSort::RatingDesc);

        assert_eq!(products[0].title, "high");
    }

    #[test]
    fn test_filters_empty_passes_everything() {
        let filters = SearchFilters::default();
        assert!(filters.matches(&product("x", "", "")));
        assert!(filters.matches(&product("y", "$5.00", "4.0")));
    }

    #[test]
    fn test_filters_price_bounds() {
        let filters = SearchFilters {
            min_price: Some(dec("10")),
            max_price: Some(dec("20")),
            min_rating: None,
        };

        assert!(filters.matches(&product("in", "$15.00", "")));
        assert!(!filters.matches(&product("below", "$5.00", "")));
        assert!(!filters.matches(&product("above", "$25.00", "")));
        // Price bound set, so an unparseable price is excluded
        assert!(!filters.matches(&product("unpriced", "", "")));
    }

    #[test]
    fn test_filters_rating_bound() {
        let filters = SearchFilters {
            min_price: None,
            max_price: None,
            min_rating: Some(4.0),
        };

        assert!(filters.matches(&product("good", "", "4.5 out of 5 stars")));
        assert!(!filters.matches(&product("bad", "", "3.2 out of 5 stars")));
        assert!(!filters.matches(&product("unrated", "", "")));
    }

    #[test]
    fn test_filters_unset_bound_keeps_partial_items() {
        // Only a rating bound: unpriced items still pass
        let filters = SearchFilters {
            min_price: None,
            max_price: None,
            min_rating: Some(4.0),
        };
        assert!(filters.matches(&product("unpriced", "", "4.2")));
    }

    #[tokio::test]
    async fn test_run_truncates_to_limit() {
        let registry = crate::retailers::AdapterRegistry::with_adapters(
            reqwest::Client::new(),
            vec![Arc::new(FixedAdapter {
                retailer: Retailer::Amazon,
                results: vec![
                    product("a", "$10.00", ""),
                    product("b", "$20.00", ""),
                    product("c", "$30.00", ""),
                ],
            })],
        );
        let currency = crate::services::currency::CurrencyService::new(Arc::new(NoRates));
        let driver = SearchDriver::new(&registry, &currency);

        let options = SearchOptions {
            limit: Some(2),
            ..SearchOptions::default()
        };
        let products = driver.run("widget", options).await;

        let titles: Vec<_> = products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn test_to_csv_layout() {
        let products = vec![
            product("Widget", "$12.50", "4.5 out of 5 stars"),
            product("Gadget", "$3.00", ""),
        ];
        let bytes = to_csv(&products, None).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Sr No.,Title,Link,Rating,Price");
        assert_eq!(
            lines[1],
            "1,Widget,https://example.com/Widget,4.5 out of 5 stars,$12.50"
        );
        assert_eq!(lines[2], "2,Gadget,https://example.com/Gadget,N/A,$3.00");
    }

    #[test]
    fn test_to_csv_applies_rate_once_per_price() {
        let products = vec![product("Widget", "$10.00", ""), product("Free", "", "")];
        let bytes = to_csv(&products, Some(dec("0.9"))).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains(",9.00\n") || text.ends_with(",9.00"));
        // Empty price stays empty rather than becoming 0
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[2].ends_with(','));
    }
}
