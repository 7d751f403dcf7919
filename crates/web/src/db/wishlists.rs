//! Wishlist repository.

use shopscout_core::{UserId, WishlistId, WishlistItemId};
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::wishlist::{DEFAULT_WISHLIST_NAME, Wishlist, WishlistItem};

const WISHLIST_NAME_TAKEN: &str = "wishlist name already in use";

/// A wishlist item as submitted by the add-item form, before it has a row.
#[derive(Debug, Clone)]
pub struct NewWishlistItem {
    pub title: String,
    /// Cleaned price text; `None` when the source showed no usable price.
    pub price: Option<String>,
    pub link: String,
    pub website: String,
    pub rating: Option<String>,
}

/// Repository for wishlists and their items.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new repository with a database connection pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The user's default wishlist, created on demand.
    ///
    /// Registration creates it, but accounts that predate that behavior get
    /// one lazily here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn default_for_user(&self, user_id: UserId) -> Result<Wishlist, RepositoryError> {
        let existing = sqlx::query_as::<_, Wishlist>(
            "SELECT id, name, user_id FROM scout.wishlists
             WHERE user_id = $1 AND name = $2",
        )
        .bind(user_id)
        .bind(DEFAULT_WISHLIST_NAME)
        .fetch_optional(self.pool)
        .await?;

        if let Some(wishlist) = existing {
            return Ok(wishlist);
        }

        let created = sqlx::query_as::<_, Wishlist>(
            "INSERT INTO scout.wishlists (name, user_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id, name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id, name, user_id",
        )
        .bind(DEFAULT_WISHLIST_NAME)
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// Create a named wishlist for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already has a wishlist
    /// with this name.
    pub async fn create(&self, user_id: UserId, name: &str) -> Result<Wishlist, RepositoryError> {
        let wishlist = sqlx::query_as::<_, Wishlist>(
            "INSERT INTO scout.wishlists (name, user_id)
             VALUES ($1, $2)
             RETURNING id, name, user_id",
        )
        .bind(name)
        .bind(user_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, WISHLIST_NAME_TAKEN))?;

        Ok(wishlist)
    }

    /// All items in a wishlist, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn items(&self, wishlist_id: WishlistId) -> Result<Vec<WishlistItem>, RepositoryError> {
        let items = sqlx::query_as::<_, WishlistItem>(
            "SELECT id, title, price, link, website, rating, wishlist_id, position
             FROM scout.wishlist_items
             WHERE wishlist_id = $1
             ORDER BY position, id",
        )
        .bind(wishlist_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Append an item to the end of a wishlist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn add_item(
        &self,
        wishlist_id: WishlistId,
        item: &NewWishlistItem,
    ) -> Result<WishlistItem, RepositoryError> {
        let created = sqlx::query_as::<_, WishlistItem>(
            "INSERT INTO scout.wishlist_items
                 (title, price, link, website, rating, wishlist_id, position)
             SELECT $1, $2, $3, $4, $5, $6, COALESCE(MAX(position) + 1, 0)
             FROM scout.wishlist_items
             WHERE wishlist_id = $6
             RETURNING id, title, price, link, website, rating, wishlist_id, position",
        )
        .bind(&item.title)
        .bind(item.price.as_deref())
        .bind(&item.link)
        .bind(&item.website)
        .bind(item.rating.as_deref())
        .bind(wishlist_id)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// Remove the item at a zero-based position in the wishlist's display
    /// order.
    ///
    /// The position is resolved and the row deleted inside one transaction,
    /// with the target row locked, so a concurrent add or delete cannot
    /// shift the order between the two statements.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the index is out of range, or
    /// `RepositoryError::Database` on query failure.
    pub async fn remove_item_at(
        &self,
        wishlist_id: WishlistId,
        index: usize,
    ) -> Result<(), RepositoryError> {
        let offset = i64::try_from(index)
            .map_err(|_| RepositoryError::DataCorruption(format!("index {index} out of range")))?;

        let mut tx = self.pool.begin().await?;

        let target: Option<(WishlistItemId,)> = sqlx::query_as(
            "SELECT id FROM scout.wishlist_items
             WHERE wishlist_id = $1
             ORDER BY position, id
             OFFSET $2 LIMIT 1
             FOR UPDATE",
        )
        .bind(wishlist_id)
        .bind(offset)
        .fetch_optional(&mut *tx)
        .await?;

        let (item_id,) = target.ok_or(RepositoryError::NotFound)?;

        sqlx::query("DELETE FROM scout.wishlist_items WHERE id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Overwrite an item's stored price text.
    ///
    /// Used by price normalization after a fresh fetch; `None` clears the
    /// price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn update_item_price(
        &self,
        item_id: WishlistItemId,
        price: Option<&str>,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE scout.wishlist_items SET price = $2 WHERE id = $1")
            .bind(item_id)
            .bind(price)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
