//! Database migration commands.
//!
//! Migration SQL lives in `crates/storefront/migrations/` and is embedded
//! at compile time, so the binary can migrate any environment it can reach.

use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Connect(String),
}

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn storefront() -> Result<(), MigrationError> {
    let pool = super::connect()
        .await
        .map_err(|e| MigrationError::Connect(e.to_string()))?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Storefront migrations complete");
    Ok(())
}
