//! Amazon adapter.
//!
//! Listing rows are `div[data-component-type="s-search-result"]`; the price
//! lives in the visually-hidden `span.a-offscreen` node, which carries the
//! full "$1,299.99" text in one piece.

use async_trait::async_trait;
use scraper::{Html, Selector};

use shopscout_core::Retailer;

use super::{
    FetchError, ScrapedProduct, SiteAdapter, absolute_url, fetch_html, first_href_in, first_text,
    first_text_in,
};

const ORIGIN: &str = "https://www.amazon.com";

/// Product page price selectors, most specific first. The priceblock ids
/// are the pre-2022 layout, still served on some category pages.
const PAGE_PRICE_SELECTORS: &[&str] = &[
    "#corePrice_feature_div span.a-offscreen",
    "span.a-price span.a-offscreen",
    "#priceblock_ourprice",
    "#priceblock_dealprice",
];

const RESULT_SELECTOR: &str = r#"div[data-component-type="s-search-result"]"#;
const TITLE_SELECTORS: &[&str] = &["h2 a span", "h2 span"];
const PRICE_SELECTORS: &[&str] = &["span.a-price span.a-offscreen"];
const LINK_SELECTORS: &[&str] = &["h2 a", "a.a-link-normal"];
const RATING_SELECTORS: &[&str] = &["span.a-icon-alt"];

pub struct AmazonAdapter;

#[async_trait]
impl SiteAdapter for AmazonAdapter {
    fn retailer(&self) -> Retailer {
        Retailer::Amazon
    }

    async fn fetch_price(
        &self,
        client: &reqwest::Client,
        url: &str,
    ) -> Result<String, FetchError> {
        let body = fetch_html(client, url).await?;
        extract_price(&body).ok_or(FetchError::PriceNotFound)
    }

    async fn search(
        &self,
        client: &reqwest::Client,
        query: &str,
    ) -> Result<Vec<ScrapedProduct>, FetchError> {
        let url = format!("{ORIGIN}/s?k={}", urlencoding::encode(query));
        let body = fetch_html(client, &url).await?;
        Ok(parse_results(&body))
    }
}

/// Pull the displayed price off a product page.
fn extract_price(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    first_text(&document, PAGE_PRICE_SELECTORS)
}

/// Parse listing results. Rows without a title or link are dropped; a
/// missing price or rating stays empty.
fn parse_results(body: &str) -> Vec<ScrapedProduct> {
    let document = Html::parse_document(body);
    let Ok(result_selector) = Selector::parse(RESULT_SELECTOR) else {
        return Vec::new();
    };

    let mut products = Vec::new();
    for row in document.select(&result_selector) {
        let Some(title) = first_text_in(&row, TITLE_SELECTORS) else {
            continue;
        };
        let Some(href) = first_href_in(&row, LINK_SELECTORS) else {
            continue;
        };

        products.push(ScrapedProduct {
            title,
            price: first_text_in(&row, PRICE_SELECTORS).unwrap_or_default(),
            link: absolute_url(ORIGIN, &href),
            website: Retailer::Amazon,
            rating: first_text_in(&row, RATING_SELECTORS).unwrap_or_default(),
        });
    }
    products
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <div data-component-type="s-search-result">
            <h2><a href="/dp/B0TEST123"><span>Noise Cancelling Headphones</span></a></h2>
            <span class="a-price"><span class="a-offscreen">$249.99</span></span>
            <span class="a-icon-alt">4.6 out of 5 stars</span>
        </div>
        <div data-component-type="s-search-result">
            <h2><a href="/dp/B0TEST456"><span>Budget Earbuds</span></a></h2>
        </div>
        <div data-component-type="s-search-result">
            <span class="a-price"><span class="a-offscreen">$9.99</span></span>
        </div>
    "#;

    #[test]
    fn test_parse_results_extracts_fields() {
        let products = parse_results(LISTING);

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].title, "Noise Cancelling Headphones");
        assert_eq!(products[0].price, "$249.99");
        assert_eq!(products[0].link, "https://www.amazon.com/dp/B0TEST123");
        assert_eq!(products[0].website, Retailer::Amazon);
        assert_eq!(products[0].rating, "4.6 out of 5 stars");
    }

    #[test]
    fn test_parse_results_keeps_priceless_rows() {
        let products = parse_results(LISTING);

        assert_eq!(products[1].title, "Budget Earbuds");
        assert_eq!(products[1].price, "");
        assert_eq!(products[1].rating, "");
    }

    #[test]
    fn test_extract_price_prefers_core_price() {
        let body = r#"
            <div id="corePrice_feature_div">
                <span class="a-price"><span class="a-offscreen">$19.99</span></span>
            </div>
            <span class="a-price"><span class="a-offscreen">$24.99</span></span>
        "#;
        assert_eq!(extract_price(body).as_deref(), Some("$19.99"));
    }

    #[test]
    fn test_extract_price_none_on_empty_page() {
        assert_eq!(extract_price("<html><body></body></html>"), None);
    }
}
