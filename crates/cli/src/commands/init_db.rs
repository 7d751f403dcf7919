//! Destructive database reset command.
//!
//! Drops the application schemas (including sqlx's migration ledger) and
//! applies every migration from scratch. The command refuses to run
//! without `--force`.
//!
//! # Usage
//!
//! ```bash
//! scout-cli init-db --force
//! ```

use secrecy::ExposeSecret;
use sqlx::PgPool;

use super::migrate::{self, MigrationError};

/// Recreate the database schemas from scratch.
///
/// # Errors
///
/// Returns `MigrationError::NotConfirmed` without `--force`, or a database
/// error if a drop or migration fails.
pub async fn run(force: bool) -> Result<(), MigrationError> {
    if !force {
        return Err(MigrationError::NotConfirmed(
            "init-db drops all Shopscout data; pass --force to confirm",
        ));
    }

    let database_url = migrate::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::warn!("Dropping application schemas");
    sqlx::query("DROP SCHEMA IF EXISTS scout CASCADE")
        .execute(&pool)
        .await?;
    sqlx::query("DROP SCHEMA IF EXISTS tower_sessions CASCADE")
        .execute(&pool)
        .await?;
    // The migration ledger lives in public; without this the fresh
    // migrations would be skipped as already applied.
    sqlx::query("DROP TABLE IF EXISTS public._sqlx_migrations")
        .execute(&pool)
        .await?;

    migrate::apply(&pool).await?;

    tracing::info!("Database initialized!");
    Ok(())
}
