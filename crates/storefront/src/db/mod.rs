//! Database operations for the storefront `PostgreSQL`.
//!
//! # Schema: `shop`
//!
//! - `shop.user` - Accounts (credentials auth, role, delivery address)
//! - `shop.category` - Product categories
//! - `shop.product` / `shop.product_review` - Vendor listings and buyer reviews
//! - `shop.cart` / `shop.cart_item` - At most one cart per user
//! - `shop.order` - Checkout snapshots with payment/shipping lifecycles
//! - `shop.vendor_application` - Vendor onboarding records
//! - `shop.forum_post` / `shop.forum_vote` / `shop.forum_comment`
//! - `shop.settings` - Single row: shipping fee, featured product
//! - `tower_sessions.session` - Session storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p teknokalakal-cli -- migrate storefront
//! ```

pub mod carts;
pub mod forum;
pub mod orders;
pub mod products;
pub mod settings;
pub mod users;
pub mod vendors;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::CartRepository;
pub use forum::ForumRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use settings::SettingsRepository;
pub use users::UserRepository;
pub use vendors::VendorRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
