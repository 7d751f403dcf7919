//! Walmart adapter.
//!
//! Walmart's interactive price markup splits dollars and cents across
//! nodes; the screen-reader span (`span.w_iUH7`) carries the whole price
//! as one string, so prefer it.

use async_trait::async_trait;
use scraper::{Html, Selector};

use shopscout_core::Retailer;

use super::{
    FetchError, ScrapedProduct, SiteAdapter, absolute_url, fetch_html, first_href_in, first_text,
    first_text_in,
};

const ORIGIN: &str = "https://www.walmart.com";

const PAGE_PRICE_SELECTORS: &[&str] = &[
    r#"span[itemprop="price"]"#,
    r#"div[data-automation-id="product-price"] span.w_iUH7"#,
    r#"div[data-automation-id="product-price"]"#,
];

const RESULT_SELECTOR: &str = "div[data-item-id]";
const TITLE_SELECTORS: &[&str] = &[r#"span[data-automation-id="product-title"]"#];
const PRICE_SELECTORS: &[&str] = &[
    r#"div[data-automation-id="product-price"] span.w_iUH7"#,
    r#"div[data-automation-id="product-price"]"#,
];
const LINK_SELECTORS: &[&str] = &[r#"a[link-identifier]"#, r#"a[href^="/ip/"]"#];
const RATING_SELECTORS: &[&str] = &[r#"span[data-testid="product-ratings"]"#, "span.w_iUH7 ~ span"];

pub struct WalmartAdapter;

#[async_trait]
impl SiteAdapter for WalmartAdapter {
    fn retailer(&self) -> Retailer {
        Retailer::Walmart
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
        let url = format!("{ORIGIN}/search?q={}", urlencoding::encode(query));
        let body = fetch_html(client, &url).await?;
        Ok(parse_results(&body))
    }
}

fn extract_price(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    first_text(&document, PAGE_PRICE_SELECTORS)
}

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
            website: Retailer::Walmart,
            rating: first_text_in(&row, RATING_SELECTORS).unwrap_or_default(),
        });
    }
    products
}
