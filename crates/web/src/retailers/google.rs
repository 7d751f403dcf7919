//! Google Shopping adapter.

use async_trait::async_trait;
use scraper::{Html, Selector};

use shopscout_core::Retailer;

use super::{
    FetchError, ScrapedProduct, SiteAdapter, absolute_url, fetch_html, first_href_in, first_text,
    first_text_in,
};

const ORIGIN: &str = "https://www.google.com";

const PAGE_PRICE_SELECTORS: &[&str] = &["span.g9WBQb", "span.a8Pemb"];

const RESULT_SELECTOR: &str = "div.sh-dgr__grid-result";
const TITLE_SELECTORS: &[&str] = &["h3.tAxDx", "h4.A2sOrd"];
const PRICE_SELECTORS: &[&str] = &["span.a8Pemb"];
const LINK_SELECTORS: &[&str] = &["a.shntl", "a"];
const RATING_SELECTORS: &[&str] = &["span.Rsc7Yb"];

pub struct GoogleShoppingAdapter;

#[async_trait]
impl SiteAdapter for GoogleShoppingAdapter {
    fn retailer(&self) -> Retailer {
        Retailer::Google
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
            "{ORIGIN}/search?tbm=shop&q={}",
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
            website: Retailer::Google,
            rating: first_text_in(&row, RATING_SELECTORS).unwrap_or_default(),
        });
    }
    products
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_results_resolves_relative_links() {
        let body = r#"
            <div class="sh-dgr__grid-result">
                <a class="shntl" href="/shopping/product/99">
                    <h3 class="tAxDx">Stand Mixer</h3>
                </a>
                <span class="a8Pemb">$199.00</span>
                <span class="Rsc7Yb">4.7</span>
            </div>
        "#;
        let products = parse_results(body);

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].link, "https://www.google.com/shopping/product/99");
        assert_eq!(products[0].rating, "4.7");
    }
}
