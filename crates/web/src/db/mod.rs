//! Database access layer.
//!
//! Each submodule exposes a repository over a borrowed [`PgPool`]:
//!
//! - [`users`] - account records and password hashes
//! - [`wishlists`] - wishlists and their saved items
//! - [`search_entries`] - per-user search history

pub mod search_entries;
pub mod users;
pub mod wishlists;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use search_entries::SearchEntryRepository;
pub use users::UserRepository;
pub use wishlists::WishlistRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Row exists but its contents could not be interpreted
    #[error("Data corruption: {0}")]
    DataCorruption(String),

    /// No row matched the query
    #[error("Not found")]
    NotFound,

    /// Unique constraint violation
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error, converting unique violations into [`Self::Conflict`].
    fn from_sqlx(err: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return Self::Conflict(conflict_message.to_string());
            }
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run pending migrations from the crate's `migrations/` directory.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
