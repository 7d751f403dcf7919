//! Wishlist and wishlist item models.

use serde::{Deserialize, Serialize};
use shopscout_core::{Retailer, UserId, WishlistId, WishlistItemId};
use sqlx::FromRow;

/// Name given to the wishlist created alongside every new account.
pub const DEFAULT_WISHLIST_NAME: &str = "default";

/// A named collection of saved products.
///
/// Every account gets one wishlist named [`DEFAULT_WISHLIST_NAME`] at
/// registration; names are unique per owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Wishlist {
    pub id: WishlistId,
    pub name: String,
    pub user_id: UserId,
}

/// A product saved to a wishlist.
///
/// `price` and `rating` are stored as the free-form text the retailer page
/// showed at save time; `NULL` means the value was absent or unusable.
/// `website` carries the retailer tag as text so rows with legacy or unknown
/// tags still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct WishlistItem {
    pub id: WishlistItemId,
    pub title: String,
    pub price: Option<String>,
    pub link: String,
    pub website: String,
    pub rating: Option<String>,
    pub wishlist_id: WishlistId,
    pub position: i32,
}

impl WishlistItem {
    /// The retailer this item was saved from, if its tag is recognized.
    #[must_use]
    pub fn retailer(&self) -> Option<Retailer> {
        Retailer::parse(&self.website)
    }

    /// Price text for display, with `NULL` rendered as "N/A".
    #[must_use]
    pub fn display_price(&self) -> &str {
        self.price.as_deref().unwrap_or("N/A")
    }

    /// Rating text for display, with `NULL` rendered as "N/A".
    #[must_use]
    pub fn display_rating(&self) -> &str {
        self.rating.as_deref().unwrap_or("N/A")
    }
}
