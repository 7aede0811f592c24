//! Order repository.
//!
//! Orders are snapshots: their `line_items` JSONB is written once at
//! checkout and never rewritten. Only the status fields move afterwards.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use teknokalakal_core::{
    Address, FailedCode, Money, OrderId, PaymentStatus, RefundStatus, ShippingStatus, UserId,
};

use super::RepositoryError;
use crate::models::order::{LineItem, Order};

const ORDER_COLUMNS: &str = "id, user_id, name, email, phone, reference_number, \
     shipping_fee_centavos, street_address, barangay, municipality, province, postal_code, \
     line_items, payment_status, shipping_status, status_description, failed_code, \
     refund_requested, refund_status, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    name: String,
    email: String,
    phone: String,
    reference_number: String,
    shipping_fee_centavos: Money,
    street_address: String,
    barangay: String,
    municipality: String,
    province: String,
    postal_code: String,
    line_items: Json<Vec<LineItem>>,
    payment_status: PaymentStatus,
    shipping_status: ShippingStatus,
    status_description: String,
    failed_code: Option<FailedCode>,
    refund_requested: bool,
    refund_status: RefundStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            reference_number: row.reference_number,
            shipping_fee: row.shipping_fee_centavos,
            address: Address {
                street_address: row.street_address,
                barangay: row.barangay,
                municipality: row.municipality,
                province: row.province,
                postal_code: row.postal_code,
            },
            line_items: row.line_items.0,
            payment_status: row.payment_status,
            shipping_status: row.shipping_status,
            status_description: row.status_description,
            failed_code: row.failed_code,
            refund_requested: row.refund_requested,
            refund_status: row.refund_status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Fields captured when an order is created at checkout.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub reference_number: String,
    pub shipping_fee: Money,
    pub address: Address,
    pub line_items: Vec<LineItem>,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a pending order snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the reference number was
    /// already used, `RepositoryError::Database` otherwise.
    pub async fn create(&self, new_order: &NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO shop.order
                 (user_id, name, email, phone, reference_number, shipping_fee_centavos,
                  street_address, barangay, municipality, province, postal_code, line_items)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(new_order.user_id)
        .bind(&new_order.name)
        .bind(&new_order.email)
        .bind(&new_order.phone)
        .bind(&new_order.reference_number)
        .bind(new_order.shipping_fee)
        .bind(&new_order.address.street_address)
        .bind(&new_order.address.barangay)
        .bind(&new_order.address.municipality)
        .bind(&new_order.address.province)
        .bind(&new_order.address.postal_code)
        .bind(Json(&new_order.line_items))
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("reference number already used".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// All orders, newest first (admin surface).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.order ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// A buyer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.order
             WHERE user_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Orders containing any of the given vendor's products, newest first.
    ///
    /// The snapshot keeps product IDs inside the JSONB line items, so the
    /// match walks the array rather than a join table.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_containing_products(
        &self,
        product_ids: &[teknokalakal_core::ProductId],
        status: Option<PaymentStatus>,
    ) -> Result<Vec<Order>, RepositoryError> {
        let raw_ids: Vec<i32> = product_ids
            .iter()
            .map(teknokalakal_core::ProductId::as_i32)
            .collect();

        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, OrderRow>(&format!(
                    "SELECT {ORDER_COLUMNS} FROM shop.order o
                     WHERE o.payment_status = $2
                       AND EXISTS (
                           SELECT 1 FROM jsonb_array_elements(o.line_items) li
                           WHERE (li->>'product_id')::int = ANY($1)
                       )
                     ORDER BY o.created_at DESC"
                ))
                .bind(&raw_ids)
                .bind(status)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, OrderRow>(&format!(
                    "SELECT {ORDER_COLUMNS} FROM shop.order o
                     WHERE EXISTS (
                         SELECT 1 FROM jsonb_array_elements(o.line_items) li
                         WHERE (li->>'product_id')::int = ANY($1)
                     )
                     ORDER BY o.created_at DESC"
                ))
                .bind(&raw_ids)
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.order WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    /// Apply a webhook-driven payment status change.
    ///
    /// Webhooks never touch shipping or the sold counters; they only move the
    /// payment status, its description and the gateway decline code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn apply_payment_event(
        &self,
        id: OrderId,
        status: PaymentStatus,
        description: &str,
        failed_code: Option<FailedCode>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE shop.order
             SET payment_status = $2, status_description = $3, failed_code = $4,
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .bind(description)
        .bind(failed_code)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Admin status update with the sold-counter cascade.
    ///
    /// When the payment status crosses the `paid` boundary, the `sold`
    /// counter of every product in the snapshot moves with it: entering
    /// `paid` increments, leaving `paid` decrements. The order update and
    /// every counter update commit or roll back together.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        payment_status: PaymentStatus,
        status_description: &str,
        shipping_status: ShippingStatus,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.order WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let previous = row.ok_or(RepositoryError::NotFound)?;
        let previous_status = previous.payment_status;

        let updated = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE shop.order
             SET payment_status = $2, status_description = $3, shipping_status = $4,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(payment_status)
        .bind(status_description)
        .bind(shipping_status)
        .fetch_one(&mut *tx)
        .await?;

        let delta = match (
            previous_status.counts_as_sold(),
            payment_status.counts_as_sold(),
        ) {
            (false, true) => 1,
            (true, false) => -1,
            _ => 0,
        };

        if delta != 0 {
            for item in &previous.line_items.0 {
                let Some(product_id) = item.product_id else {
                    continue;
                };
                sqlx::query("UPDATE shop.product SET sold = sold + $2 WHERE id = $1")
                    .bind(product_id)
                    .bind(delta * i32::try_from(item.quantity).unwrap_or(0))
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(updated.into())
    }

    /// Record a buyer's refund request on a paid order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn mark_refund_requested(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE shop.order
             SET refund_requested = TRUE, refund_status = 'pending', updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Resolve a refund request.
    ///
    /// Approval also flips the payment status to `refunded`; rejection only
    /// marks the request.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn resolve_refund(&self, id: OrderId, approve: bool) -> Result<(), RepositoryError> {
        let result = if approve {
            sqlx::query(
                "UPDATE shop.order
                 SET refund_status = 'approved', payment_status = 'refunded',
                     updated_at = NOW()
                 WHERE id = $1",
            )
            .bind(id)
            .execute(self.pool)
            .await?
        } else {
            sqlx::query(
                "UPDATE shop.order
                 SET refund_status = 'rejected', updated_at = NOW()
                 WHERE id = $1",
            )
            .bind(id)
            .execute(self.pool)
            .await?
        };

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
