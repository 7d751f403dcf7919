//! Integration tests for wishlist management and sharing.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The web server running (cargo run -p shopscout-web)
//! - SMTP credentials in the environment for the sharing test
//!
//! Run with: cargo test -p shopscout-integration-tests -- --ignored
//!
//! Each test registers its own throwaway account, so wishlists never
//! leak between tests or runs. The wishlist page refreshes prices by
//! re-fetching each item's product page, which tolerates retailers that
//! refuse the request, so no network access is assumed beyond the
//! server itself.

use reqwest::{Client, StatusCode};
use uuid::Uuid;

const TEST_PASSWORD: &str = "correct-horse-battery";

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

fn unique_email() -> String {
    format!("it-{}@example.com", Uuid::new_v4())
}

/// Register a fresh account on this client; the session cookie it picks
/// up makes the client logged in.
async fn register_new_user(client: &Client) -> String {
    let email = unique_email();
    let resp = client
        .post(format!("{}/register", base_url()))
        .form(&[("username", email.as_str()), ("password", TEST_PASSWORD)])
        .send()
        .await
        .expect("Failed to register test user");

    assert_eq!(resp.status(), StatusCode::OK, "registration did not land on the home page");
    email
}

/// Save one item to the logged-in client's wishlist.
async fn add_test_item(client: &Client, title: &str) {
    let resp = client
        .post(format!("{}/add-wishlist-item", base_url()))
        .form(&[
            ("title", title),
            ("price", "$19.99"),
            ("link", "https://www.example.com/product/1"),
            ("website", "amazon"),
            ("rating", "4.5"),
        ])
        .send()
        .await
        .expect("Failed to add wishlist item");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/wishlist");
}

// ============================================================================
// Access Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server and database"]
async fn test_wishlist_requires_login() {
    let resp = client()
        .get(format!("{}/wishlist", base_url()))
        .send()
        .await
        .expect("Failed to get wishlist");

    assert_eq!(resp.url().path(), "/login");
}

#[tokio::test]
#[ignore = "Requires running web server and database"]
async fn test_fresh_account_has_empty_wishlist() {
    let client = client();
    let email = register_new_user(&client).await;

    let resp = client
        .get(format!("{}/wishlist", base_url()))
        .send()
        .await
        .expect("Failed to get wishlist");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains(&email));
    assert!(body.contains("Nothing saved yet"));
}

// ============================================================================
// Item Management Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server and database"]
async fn test_add_and_delete_item() {
    let client = client();
    register_new_user(&client).await;

    let title = format!("Integration Widget {}", Uuid::new_v4());
    add_test_item(&client, &title).await;

    let resp = client
        .get(format!("{}/wishlist", base_url()))
        .send()
        .await
        .expect("Failed to get wishlist");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains(&title));

    // Items are addressed by display position
    let resp = client
        .post(format!("{}/delete-wishlist-item", base_url()))
        .form(&[("index", "0")])
        .send()
        .await
        .expect("Failed to delete wishlist item");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/wishlist");

    let body = resp.text().await.expect("Failed to read response");
    assert!(!body.contains(&title));
}

#[tokio::test]
#[ignore = "Requires running web server and database"]
async fn test_delete_removes_the_item_at_that_position() {
    let client = client();
    register_new_user(&client).await;

    let first = format!("First Widget {}", Uuid::new_v4());
    let second = format!("Second Widget {}", Uuid::new_v4());
    add_test_item(&client, &first).await;
    add_test_item(&client, &second).await;

    let resp = client
        .post(format!("{}/delete-wishlist-item", base_url()))
        .form(&[("index", "0")])
        .send()
        .await
        .expect("Failed to delete wishlist item");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read response");
    assert!(!body.contains(&first));
    assert!(body.contains(&second));
}

#[tokio::test]
#[ignore = "Requires running web server and database"]
async fn test_add_item_rejects_garbage_price() {
    let client = client();
    register_new_user(&client).await;

    let resp = client
        .post(format!("{}/add-wishlist-item", base_url()))
        .form(&[
            ("title", "Bad Price Widget"),
            ("price", "about twelve"),
            ("link", "https://www.example.com/product/2"),
            ("website", "amazon"),
        ])
        .send()
        .await
        .expect("Failed to post item");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Invalid price format"));
}

#[tokio::test]
#[ignore = "Requires running web server and database"]
async fn test_delete_out_of_range_index_is_404() {
    let client = client();
    register_new_user(&client).await;

    let resp = client
        .post(format!("{}/delete-wishlist-item", base_url()))
        .form(&[("index", "42")])
        .send()
        .await
        .expect("Failed to post delete");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Sharing Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server, database, and SMTP credentials"]
async fn test_share_sends_wishlist_links() {
    let client = client();
    register_new_user(&client).await;
    add_test_item(&client, "Shared Widget").await;

    let resp = client
        .post(format!("{}/share", base_url()))
        .form(&[("email", unique_email().as_str())])
        .send()
        .await
        .expect("Failed to post share");

    // Lands back on the wishlist when the relay accepts the message; a
    // send failure is a server error, never a client one.
    assert!(
        !resp.status().is_client_error(),
        "share rejected as client error: {}",
        resp.status()
    );
    if resp.status().is_success() {
        assert_eq!(resp.url().path(), "/wishlist");
    }
}
