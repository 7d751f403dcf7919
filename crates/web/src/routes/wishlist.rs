//! Wishlist route handlers.
//!
//! All item routes operate on the user's `default` wishlist. Reading the
//! wishlist runs every item through the price normalizer, so the page
//! always shows freshly fetched prices where the retailer still serves
//! them.

use askama::Template;
use askama_web::WebTemplate;
use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::db::wishlists::NewWishlistItem;
use crate::db::{RepositoryError, WishlistRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::wishlist::WishlistItem;
use crate::services::normalizer::PriceNormalizer;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// A scraped search result being saved to the wishlist.
#[derive(Debug, Deserialize)]
pub struct AddItemForm {
    pub title: String,
    pub price: Option<String>,
    pub link: String,
    pub website: String,
    pub rating: Option<String>,
}

/// Item removal form data.
#[derive(Debug, Deserialize)]
pub struct DeleteItemForm {
    /// Zero-based position of the item in the wishlist's display order.
    pub index: usize,
}

/// Wishlist sharing form data.
#[derive(Debug, Deserialize)]
pub struct ShareForm {
    /// Recipient address.
    pub email: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/index.html")]
pub struct WishlistTemplate {
    pub username: String,
    pub items: Vec<WishlistItem>,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the wishlist with refreshed prices.
///
/// # Route
///
/// `GET /wishlist`
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<WishlistTemplate> {
    let repo = WishlistRepository::new(state.pool());
    let wishlist = repo.default_for_user(user.id).await?;

    let normalizer = PriceNormalizer::new(state.registry(), state.currency());
    let items = normalizer.normalized_items(&repo, wishlist.id).await?;

    Ok(WishlistTemplate {
        username: user.username.into_inner(),
        items,
    })
}

/// Save a scraped result to the wishlist.
///
/// # Route
///
/// `POST /add-wishlist-item`
#[instrument(skip_all)]
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<AddItemForm>,
) -> Result<Redirect> {
    let price = clean_price_input(form.price.as_deref())?;

    let repo = WishlistRepository::new(state.pool());
    let wishlist = repo.default_for_user(user.id).await?;

    repo.add_item(
        wishlist.id,
        &NewWishlistItem {
            title: form.title,
            price,
            link: form.link,
            website: form.website,
            rating: form.rating.filter(|r| !r.trim().is_empty()),
        },
    )
    .await?;

    Ok(Redirect::to("/wishlist"))
}

/// Remove the item at a zero-based position.
///
/// # Route
///
/// `POST /delete-wishlist-item`
#[instrument(skip_all)]
pub async fn delete_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<DeleteItemForm>,
) -> Result<Redirect> {
    let repo = WishlistRepository::new(state.pool());
    let wishlist = repo.default_for_user(user.id).await?;

    match repo.remove_item_at(wishlist.id, form.index).await {
        Ok(()) => Ok(Redirect::to("/wishlist")),
        // An out-of-range index is the client's mistake, not a server fault
        Err(RepositoryError::NotFound) => Err(AppError::NotFound),
        Err(err) => Err(err.into()),
    }
}

/// Email the wishlist's links to a recipient.
///
/// # Route
///
/// `POST /share`
#[instrument(skip_all)]
pub async fn share(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<ShareForm>,
) -> Result<Redirect> {
    let repo = WishlistRepository::new(state.pool());
    let wishlist = repo.default_for_user(user.id).await?;

    // Sharing sends the stored links as-is; no price refresh
    let items = repo.items(wishlist.id).await?;
    let links: Vec<String> = items.into_iter().map(|item| item.link).collect();

    state
        .email()
        .send_wishlist_share(&form.email, user.username.as_str(), &links)
        .await?;

    Ok(Redirect::to("/wishlist"))
}

/// Clean a price string off a scraped result into storable form.
///
/// Strips `$` signs and thousands separators, trims, and maps empty or
/// `N/A` input to "no price". Anything left over must parse as a plain
/// number.
fn clean_price_input(raw: Option<&str>) -> Result<Option<String>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let cleaned = raw.replace(['$', ','], "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned == "N/A" {
        return Ok(None);
    }

    let amount: Decimal = cleaned
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid price format".to_string()))?;

    Ok(Some(amount.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_price_strips_symbols() {
        assert_eq!(
            clean_price_input(Some("$1,299.99")).unwrap(),
            Some("1299.99".to_string())
        );
        assert_eq!(
            clean_price_input(Some(" $29.97 ")).unwrap(),
            Some("29.97".to_string())
        );
    }

    #[test]
    fn test_clean_price_empty_and_na_store_nothing() {
        assert_eq!(clean_price_input(None).unwrap(), None);
        assert_eq!(clean_price_input(Some("")).unwrap(), None);
        assert_eq!(clean_price_input(Some("  ")).unwrap(), None);
        assert_eq!(clean_price_input(Some("N/A")).unwrap(), None);
        assert_eq!(clean_price_input(Some("$N/A")).unwrap(), None);
    }

    #[test]
    fn test_clean_price_rejects_garbage() {
        let err = clean_price_input(Some("about twelve")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = clean_price_input(Some("12.50 USD")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
