//! Admin order management.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use teknokalakal_core::{OrderId, PaymentStatus, ShippingStatus};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Order;
use crate::state::AppState;

/// Status update body.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub status_description: Option<String>,
    pub shipping_status: ShippingStatus,
}

/// Refund resolution body.
#[derive(Debug, Deserialize)]
pub struct ResolveRefundRequest {
    /// `approve` or `reject`.
    pub action: String,
}

/// GET /admin/orders - All orders, newest first.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;
    Ok(Json(orders))
}

/// PUT /admin/orders/{id} - Set payment and shipping status.
///
/// Crossing the `paid` boundary moves the sold counters of every product
/// in the order's snapshot, in the same transaction.
#[instrument(skip(state, admin, request), fields(admin_id = %admin.id))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let description = request
        .status_description
        .unwrap_or_else(|| default_description(request.payment_status).to_owned());

    let order = OrderRepository::new(state.pool())
        .update_status(
            id,
            request.payment_status,
            &description,
            request.shipping_status,
        )
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("Order".to_owned()),
            other => AppError::Database(other),
        })?;

    tracing::info!(
        order_id = %id,
        payment_status = %order.payment_status,
        shipping_status = %order.shipping_status,
        "order status updated"
    );

    Ok(Json(order))
}

/// POST /admin/orders/{id}/refund - Approve or reject a refund request.
#[instrument(skip(state, admin, request), fields(admin_id = %admin.id))]
pub async fn resolve_refund(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(request): Json<ResolveRefundRequest>,
) -> Result<Json<serde_json::Value>> {
    let approve = match request.action.as_str() {
        "approve" => true,
        "reject" => false,
        _ => return Err(AppError::BadRequest("Invalid action".to_owned())),
    };

    let repo = OrderRepository::new(state.pool());

    if repo.get(id).await?.is_none() {
        return Err(AppError::NotFound("Order".to_owned()));
    }

    repo.resolve_refund(id, approve).await?;

    let message = if approve {
        "Refund request approved successfully"
    } else {
        "Refund request rejected successfully"
    };
    Ok(Json(serde_json::json!({ "message": message })))
}

/// Stock descriptions for admin status changes without an explicit one.
const fn default_description(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "Order pending payment",
        PaymentStatus::Paid => "Payment successfully processed",
        PaymentStatus::Failed => "Payment failed",
        PaymentStatus::InsufficientFunds => "Transaction failed due to insufficient funds",
        PaymentStatus::Cancelled => "Payment was cancelled",
        PaymentStatus::Refunded => "Refund processed",
        PaymentStatus::CheckoutCancelled => "Checkout was cancelled before completion",
        PaymentStatus::CheckoutExpired => "Checkout session expired",
    }
}
