//! User account repository.

use shopscout_core::Email;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::User;
use crate::models::wishlist::DEFAULT_WISHLIST_NAME;

const USERNAME_TAKEN: &str = "username already registered";

/// Repository for account records.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new repository with a database connection pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up an account by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn find_by_username(
        &self,
        username: &Email,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username FROM scout.users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Look up an account together with its password hash.
    ///
    /// The hash is handed out separately from [`User`] so it never rides
    /// along into sessions or templates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn find_with_password_hash(
        &self,
        username: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, (i32, Email, String)>(
            "SELECT id, username, password_hash FROM scout.users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(id, username, hash)| {
            (
                User {
                    id: id.into(),
                    username,
                },
                hash,
            )
        }))
    }

    /// Create an account and its default wishlist in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken, or
    /// `RepositoryError::Database` on other failures.
    pub async fn create(
        &self,
        username: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO scout.users (username, password_hash)
             VALUES ($1, $2)
             RETURNING id, username",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, USERNAME_TAKEN))?;

        sqlx::query("INSERT INTO scout.wishlists (name, user_id) VALUES ($1, $2)")
            .bind(DEFAULT_WISHLIST_NAME)
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Find an account by username, creating one with an empty password hash
    /// if none exists.
    ///
    /// Used for OAuth sign-in: the identity provider vouched for the email,
    /// so the account never gets a usable password. An empty hash verifies
    /// against nothing, which keeps the password login path closed for these
    /// accounts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn find_or_create(&self, username: &Email) -> Result<User, RepositoryError> {
        if let Some(user) = self.find_by_username(username).await? {
            return Ok(user);
        }

        match self.create(username, "").await {
            Ok(user) => Ok(user),
            // Lost a race with a concurrent first sign-in; the row exists now.
            Err(RepositoryError::Conflict(_)) => self
                .find_by_username(username)
                .await?
                .ok_or(RepositoryError::NotFound),
            Err(e) => Err(e),
        }
    }
}
