//! Buyer-facing order route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use teknokalakal_core::OrderId;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::state::AppState;

/// GET /orders - The session user's orders, newest first.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_by_user(user.id)
        .await?;
    Ok(Json(orders))
}

/// GET /orders/{id} - One order; the owner or an admin may look.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_owned()))?;

    if order.user_id != user.id && !user.is_admin() {
        return Err(AppError::Forbidden(
            "You are not authorized to view this order".to_owned(),
        ));
    }

    Ok(Json(order))
}

/// POST /orders/{id}/refund - Request a refund on one's own paid order.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn request_refund(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<serde_json::Value>> {
    let repo = OrderRepository::new(state.pool());

    let order = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_owned()))?;

    if order.user_id != user.id {
        return Err(AppError::Forbidden(
            "You are not authorized to refund this order".to_owned(),
        ));
    }

    if !order.payment_status.refundable() {
        return Err(AppError::BadRequest(
            "Only paid orders can be refunded".to_owned(),
        ));
    }

    repo.mark_refund_requested(id).await?;

    tracing::info!(order_id = %id, "refund requested");

    Ok(Json(serde_json::json!({
        "message": "Refund request submitted successfully"
    })))
}
