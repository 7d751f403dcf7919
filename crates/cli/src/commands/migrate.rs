//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! scout-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPSCOUT_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/web/migrations/` and are embedded into this
//! binary at compile time, so the deployed CLI does not need the source
//! tree next to it.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;

/// Errors from the migration commands.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Refusing to run: {0}")]
    NotConfirmed(&'static str),
}

/// Read the database URL from the environment.
pub(crate) fn database_url() -> Result<SecretString, MigrationError> {
    dotenvy::dotenv().ok();

    std::env::var("SHOPSCOUT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MigrationError::MissingEnvVar("SHOPSCOUT_DATABASE_URL"))
}

/// Apply pending database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    apply(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}

/// Run the embedded migration set against an open pool.
pub(crate) async fn apply(pool: &PgPool) -> Result<(), MigrationError> {
    tracing::info!("Running migrations...");
    sqlx::migrate!("../web/migrations").run(pool).await?;
    Ok(())
}
