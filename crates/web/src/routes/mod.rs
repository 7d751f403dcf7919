//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                      - Landing page
//! GET  /health                - Liveness check
//! GET  /ready                 - Readiness check (database ping)
//!
//! # Auth
//! GET  /login                 - Login / registration page
//! POST /login                 - Password check, issues a one-time code
//! POST /verify-otp            - Verify the emailed code, logs in
//! POST /resend-otp            - Re-send the code for a pending login
//! POST /register              - Create an account and log in
//! GET  /logout                - Destroy the session
//!
//! # Google OAuth
//! GET  /login/google          - Redirect to Google's consent page
//! GET  /google/callback       - Handle the OAuth callback
//!
//! # Search
//! GET  /search                - Search all retailers (?product_name=...)
//! POST /filter                - Same search with sort/currency/bounds
//! GET  /export_csv            - Stream results as a CSV attachment
//!
//! # Wishlist (requires auth)
//! GET  /wishlist              - Wishlist with refreshed prices
//! POST /add-wishlist-item     - Save a scraped result
//! POST /delete-wishlist-item  - Remove an item by position
//! POST /share                 - Email the wishlist's links
//! ```

pub mod auth;
pub mod home;
pub mod oauth;
pub mod search;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/verify-otp", post(auth::verify_otp))
        .route("/resend-otp", post(auth::resend_otp))
        .route("/register", post(auth::register))
        .route("/logout", get(auth::logout))
        // Google OAuth
        .route("/login/google", get(oauth::login))
        .route("/google/callback", get(oauth::callback))
}

/// Create the search routes router.
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search::search))
        .route("/filter", post(search::filter))
        .route("/export_csv", get(search::export_csv))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/wishlist", get(wishlist::show))
        .route("/add-wishlist-item", post(wishlist::add_item))
        .route("/delete-wishlist-item", post(wishlist::delete_item))
        .route("/share", post(wishlist::share))
}

/// Create all application routes.
///
/// Paths are flat by design: they are the addresses the result and
/// wishlist templates post to.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(auth_routes())
        .merge(search_routes())
        .merge(wishlist_routes())
}
