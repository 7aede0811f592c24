//! Cart repository.
//!
//! Invariants enforced here:
//! - at most one cart row per user (`UNIQUE (user_id)`)
//! - item quantities stay >= 1 (`CHECK`)
//! - the cart row is deleted when its last item is removed

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use teknokalakal_core::{CategoryId, Money, ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::CartLine;
use crate::models::product::{ImageRef, Product};

#[derive(sqlx::FromRow)]
struct CartLineRow {
    quantity: i32,
    id: i32,
    vendor_id: i32,
    title: String,
    description: Option<String>,
    price_centavos: Money,
    stock: i32,
    sold: i32,
    images: Json<Vec<ImageRef>>,
    category_id: Option<i32>,
    properties: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            quantity: row.quantity,
            product: Product {
                id: ProductId::new(row.id),
                vendor_id: UserId::new(row.vendor_id),
                title: row.title,
                description: row.description,
                price: row.price_centavos,
                stock: row.stock,
                sold: row.sold,
                images: row.images.0,
                category_id: row.category_id.map(CategoryId::new),
                properties: row.properties,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The user's cart lines joined with their products.
    ///
    /// Returns an empty list when the user has no cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_lines(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            "SELECT ci.quantity,
                    p.id, p.vendor_id, p.title, p.description, p.price_centavos,
                    p.stock, p.sold, p.images, p.category_id, p.properties,
                    p.created_at, p.updated_at
             FROM shop.cart c
             JOIN shop.cart_item ci ON ci.cart_id = c.id
             JOIN shop.product p ON p.id = ci.product_id
             WHERE c.user_id = $1
             ORDER BY ci.id",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CartLine::from).collect())
    }

    /// Add a product to the user's cart, creating the cart on first use.
    ///
    /// Adding a product already in the cart increments its quantity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails (including a
    /// foreign-key violation for an unknown product).
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let cart_id: i32 = sqlx::query_scalar(
            "INSERT INTO shop.cart (user_id)
             VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET updated_at = NOW()
             RETURNING id",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO shop.cart_item (cart_id, product_id, quantity)
             VALUES ($1, $2, $3)
             ON CONFLICT (cart_id, product_id)
             DO UPDATE SET quantity = shop.cart_item.quantity + EXCLUDED.quantity",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no cart or the
    /// product is not in it.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE shop.cart_item ci
             SET quantity = $3
             FROM shop.cart c
             WHERE ci.cart_id = c.id AND c.user_id = $1 AND ci.product_id = $2",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("UPDATE shop.cart SET updated_at = NOW() WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Remove a product from the cart.
    ///
    /// When the last item goes, the cart row goes with it.
    ///
    /// # Returns
    ///
    /// `true` when the now-empty cart was deleted as well.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no cart.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let cart_id: Option<i32> = sqlx::query_scalar("SELECT id FROM shop.cart WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(cart_id) = cart_id else {
            return Err(RepositoryError::NotFound);
        };

        sqlx::query("DELETE FROM shop.cart_item WHERE cart_id = $1 AND product_id = $2")
            .bind(cart_id)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        let remaining: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM shop.cart_item WHERE cart_id = $1")
                .bind(cart_id)
                .fetch_one(&mut *tx)
                .await?;

        let cart_deleted = remaining == 0;
        if cart_deleted {
            sqlx::query("DELETE FROM shop.cart WHERE id = $1")
                .bind(cart_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(cart_deleted)
    }

    /// Delete the user's cart entirely.
    ///
    /// A no-op when the user has no cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM shop.cart WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
