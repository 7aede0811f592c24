//! CLI subcommand implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;

/// Connect to the storefront database using the usual environment variables.
///
/// # Errors
///
/// Returns an error when the URL is missing or the connection fails.
pub async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| "STOREFRONT_DATABASE_URL is not set")?;

    let pool = teknokalakal_storefront::db::create_pool(&SecretString::from(database_url)).await?;
    Ok(pool)
}
