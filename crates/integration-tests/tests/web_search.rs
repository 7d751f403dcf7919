//! Integration tests for search, filtering, and CSV export.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The web server running (cargo run -p shopscout-web)
//! - Outbound network access from the server to the retailer sites
//!
//! Run with: cargo test -p shopscout-integration-tests -- --ignored
//!
//! Retailers rate-limit and block scrapers, so result counts are
//! unpredictable; a page with zero rows is still a passing search. The
//! assertions here stick to page structure and response headers.

use reqwest::{Client, StatusCode};
use shopscout_core::Retailer;

/// Base URL for the web server (configurable via environment).
fn base_url() -> String {
    std::env::var("SHOPSCOUT_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

// ============================================================================
// Search Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server and network access to retailers"]
async fn test_search_renders_result_page() {
    let resp = client()
        .get(format!("{}/search", base_url()))
        .query(&[("product_name", "laptop")])
        .send()
        .await
        .expect("Failed to run search");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");

    assert!(body.contains("Results for"));
    assert!(body.contains("laptop"));
    assert!(body.contains("/export_csv"));
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_search_requires_a_product_name() {
    let base_url = base_url();
    let client = client();

    let resp = client
        .get(format!("{base_url}/search"))
        .send()
        .await
        .expect("Failed to run search");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // A blank name is as good as none
    let resp = client
        .get(format!("{base_url}/search"))
        .query(&[("product_name", "   ")])
        .send()
        .await
        .expect("Failed to run search");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Filter Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server and network access to retailers"]
async fn test_filter_accepts_every_retailer_tag() {
    let base_url = base_url();
    let client = client();

    for retailer in Retailer::ALL {
        let resp = client
            .post(format!("{base_url}/filter"))
            .query(&[("product_name", "headphones")])
            .form(&[
                ("sort", "price-asc"),
                ("currency", "usd"),
                ("website", retailer.as_str()),
            ])
            .send()
            .await
            .expect("Failed to post filter");

        assert!(
            !resp.status().is_client_error(),
            "filter rejected website tag {}: {}",
            retailer.as_str(),
            resp.status()
        );
    }
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_filter_rejects_unknown_website() {
    let resp = client()
        .post(format!("{}/filter", base_url()))
        .query(&[("product_name", "headphones")])
        .form(&[("website", "frys")])
        .send()
        .await
        .expect("Failed to post filter");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Unknown website"));
}

#[tokio::test]
#[ignore = "Requires running web server and network access to retailers"]
async fn test_filter_with_bounds_and_currency() {
    let resp = client()
        .post(format!("{}/filter", base_url()))
        .query(&[("product_name", "headphones")])
        .form(&[
            ("sort", "rating-desc"),
            ("currency", "eur"),
            ("website", "all"),
            ("min_price", "10"),
            ("max_price", "250"),
            ("min_rating", "3.5"),
        ])
        .send()
        .await
        .expect("Failed to post filter");

    // Rate lookups fall back to unconverted prices, so this never 500s
    // over the currency; a zero-row page is still OK.
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Results for"));
}

// ============================================================================
// CSV Export Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server and network access to retailers"]
async fn test_export_csv_returns_an_attachment() {
    let resp = client()
        .get(format!("{}/export_csv", base_url()))
        .query(&[("product_name", "laptop")])
        .send()
        .await
        .expect("Failed to export CSV");

    assert_eq!(resp.status(), StatusCode::OK);

    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        content_type.starts_with("text/csv"),
        "unexpected content type: {content_type}"
    );

    let disposition = resp
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("laptop.csv"));

    let body = resp.text().await.expect("Failed to read response");
    let header_row = body.lines().next().unwrap_or_default();
    assert_eq!(header_row, "Sr No.,Title,Link,Rating,Price");
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_export_csv_requires_a_product_name() {
    let resp = client()
        .get(format!("{}/export_csv", base_url()))
        .send()
        .await
        .expect("Failed to export CSV");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
