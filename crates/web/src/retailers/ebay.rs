//! eBay adapter.

use async_trait::async_trait;
use scraper::{Html, Selector};

use shopscout_core::Retailer;

use super::{
    FetchError, ScrapedProduct, SiteAdapter, absolute_url, fetch_html, first_href_in, first_text,
    first_text_in,
};

const ORIGIN: &str = "https://www.ebay.com";

const PAGE_PRICE_SELECTORS: &[&str] = &[
    "div.x-price-primary span.ux-textspans",
    "span#prcIsum",
    "span.x-price-approx__price",
];

const RESULT_SELECTOR: &str = "li.s-item";
const TITLE_SELECTORS: &[&str] = &["div.s-item__title span", "div.s-item__title"];
const PRICE_SELECTORS: &[&str] = &["span.s-item__price"];
const LINK_SELECTORS: &[&str] = &["a.s-item__link"];
const RATING_SELECTORS: &[&str] = &[
    "div.x-star-rating span.clipped",
    "span.s-item__reviews span.clipped",
];

/// The listing page's leading `li.s-item` is a "Shop on eBay" placeholder
/// card with this title.
const PLACEHOLDER_TITLE: &str = "Shop on eBay";

pub struct EbayAdapter;

#[async_trait]
impl SiteAdapter for EbayAdapter {
    fn retailer(&self) -> Retailer {
        Retailer::Ebay
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
        let url = format!("{ORIGIN}/sch/i.html?_nkw={}", urlencoding::encode(query));
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
        if title == PLACEHOLDER_TITLE {
            continue;
        }
        let Some(href) = first_href_in(&row, LINK_SELECTORS) else {
            continue;
        };

        products.push(ScrapedProduct {
            title,
            price: first_text_in(&row, PRICE_SELECTORS).unwrap_or_default(),
            link: absolute_url(ORIGIN, &href),
            website: Retailer::Ebay,
            rating: first_text_in(&row, RATING_SELECTORS).unwrap_or_default(),
        });
    }
    products
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <li class="s-item">
            <a class="s-item__link" href="https://www.ebay.com/itm/000"></a>
            <div class="s-item__title"><span>Shop on eBay</span></div>
            <span class="s-item__price">$20.00</span>
        </li>
        <li class="s-item">
            <a class="s-item__link" href="https://www.ebay.com/itm/123"></a>
            <div class="s-item__title"><span>Vintage Camera</span></div>
            <span class="s-item__price">$75.00</span>
            <div class="x-star-rating"><span class="clipped">4.5 out of 5 stars.</span></div>
        </li>
    "#;

    #[test]
    fn test_parse_results_skips_placeholder_card() {
        let products = parse_results(LISTING);

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Vintage Camera");
        assert_eq!(products[0].price, "$75.00");
        assert_eq!(products[0].link, "https://www.ebay.com/itm/123");
        assert_eq!(products[0].rating, "4.5 out of 5 stars.");
    }

    #[test]
    fn test_extract_price_from_product_page() {
        let body = r#"
            <div class="x-price-primary">
                <span class="ux-textspans">US $75.00</span>
            </div>
        "#;
        assert_eq!(extract_price(body).as_deref(), Some("US $75.00"));
    }
}
