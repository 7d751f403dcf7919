//! Search history repository.

use shopscout_core::UserId;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::SearchEntry;

/// Repository for per-user search history.
pub struct SearchEntryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SearchEntryRepository<'a> {
    /// Create a new repository with a database connection pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a search term for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn record(
        &self,
        user_id: UserId,
        search_term: &str,
    ) -> Result<SearchEntry, RepositoryError> {
        let entry = sqlx::query_as::<_, SearchEntry>(
            "INSERT INTO scout.search_entries (user_id, search_term)
             VALUES ($1, $2)
             RETURNING id, user_id, search_term, created_at",
        )
        .bind(user_id)
        .bind(search_term)
        .fetch_one(self.pool)
        .await?;

        Ok(entry)
    }

    /// The user's most recent searches, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn recent_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<SearchEntry>, RepositoryError> {
        let entries = sqlx::query_as::<_, SearchEntry>(
            "SELECT id, user_id, search_term, created_at
             FROM scout.search_entries
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }
}
