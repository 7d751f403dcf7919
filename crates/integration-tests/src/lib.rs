//! Integration tests for Shopscout.
//!
//! # Running Tests
//!
//! ```bash
//! # Apply migrations, then start the web server
//! cargo run -p shopscout-cli -- migrate
//! cargo run -p shopscout-web
//!
//! # Run the integration tests against it
//! cargo test -p shopscout-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `web_health` - Liveness, readiness, and static asset tests
//! - `web_auth` - Registration, login, and session tests
//! - `web_search` - Search, filter, and CSV export tests
//! - `web_wishlist` - Wishlist management and sharing tests
//!
//! Every test is `#[ignore]`d because it needs a running server and
//! database; the target server is read from `SHOPSCOUT_BASE_URL`
//! (default `http://localhost:5000`).
//!
//! The search tests additionally reach the live retailer sites through
//! the server's scrapers, so their result counts depend on how the
//! retailers feel about automated traffic that day. They assert page
//! structure, not result contents.
