//! Shop settings repository.
//!
//! A single row (id = 1, seeded by migration) holds the flat shipping fee
//! and the featured-product choice.

use sqlx::PgPool;

use teknokalakal_core::{Money, ProductId};

use super::RepositoryError;

/// The single shop settings row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ShopSettings {
    /// Flat shipping fee charged on every order.
    pub shipping_fee: Money,
    /// Product highlighted on the home page, if any.
    pub featured_product_id: Option<ProductId>,
}

#[derive(sqlx::FromRow)]
struct SettingsRow {
    shipping_fee_centavos: Money,
    featured_product_id: Option<i32>,
}

/// Repository for the shop settings row.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the settings row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the seeded row is missing.
    pub async fn get(&self) -> Result<ShopSettings, RepositoryError> {
        let row = sqlx::query_as::<_, SettingsRow>(
            "SELECT shipping_fee_centavos, featured_product_id FROM shop.settings WHERE id = 1",
        )
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(ShopSettings {
            shipping_fee: row.shipping_fee_centavos,
            featured_product_id: row.featured_product_id.map(ProductId::new),
        })
    }

    /// Set the flat shipping fee.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_shipping_fee(&self, fee: Money) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE shop.settings SET shipping_fee_centavos = $1, updated_at = NOW() WHERE id = 1",
        )
        .bind(fee)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Choose (or clear) the featured product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails (including a
    /// foreign-key violation for an unknown product).
    pub async fn set_featured_product(
        &self,
        product_id: Option<ProductId>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE shop.settings SET featured_product_id = $1, updated_at = NOW() WHERE id = 1",
        )
        .bind(product_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
