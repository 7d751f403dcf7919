//! Best Buy adapter.

use async_trait::async_trait;
use scraper::{Html, Selector};

use shopscout_core::Retailer;

use super::{
    FetchError, ScrapedProduct, SiteAdapter, absolute_url, fetch_html, first_href_in, first_text,
    first_text_in,
};

const ORIGIN: &str = "https://www.bestbuy.com";

const PAGE_PRICE_SELECTORS: &[&str] = &[
    r#"div.priceView-customer-price span[aria-hidden="true"]"#,
    "div.priceView-customer-price span",
    "div.priceView-hero-price span",
];

const RESULT_SELECTOR: &str = "li.sku-item";
const TITLE_SELECTORS: &[&str] = &["h4.sku-title a", "h4.sku-header a"];
const PRICE_SELECTORS: &[&str] = &[
    r#"div.priceView-customer-price span[aria-hidden="true"]"#,
    "div.priceView-customer-price span",
];
const LINK_SELECTORS: &[&str] = &["h4.sku-title a", "h4.sku-header a"];
const RATING_SELECTORS: &[&str] = &["div.ratings-reviews p.visually-hidden", "span.c-reviews"];

pub struct BestBuyAdapter;

#[async_trait]
impl SiteAdapter for BestBuyAdapter {
    fn retailer(&self) -> Retailer {
        Retailer::BestBuy
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
        let url = format!(
            "{ORIGIN}/site/searchpage.jsp?st={}",
            urlencoding::encode(query)
        );
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
            website: Retailer::BestBuy,
            rating: first_text_in(&row, RATING_SELECTORS).unwrap_or_default(),
        });
    }
    products
}
