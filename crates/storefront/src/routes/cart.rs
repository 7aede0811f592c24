//! Cart route handlers.
//!
//! All cart endpoints require a session user; guest carts live in browser
//! local storage and are hydrated through `POST /products/by-ids`.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use teknokalakal_core::ProductId;

use crate::db::{CartRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::CartLine;
use crate::state::AppState;

/// Add-to-cart body.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    /// Defaults to 1 when omitted.
    pub quantity: Option<i32>,
}

/// Set-quantity body.
#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Remove-item body.
#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub product_id: ProductId,
}

/// Cart response body.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: Vec<CartLine>,
}

/// GET /cart - The session user's cart with product details.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartResponse>> {
    let cart = CartRepository::new(state.pool()).get_lines(user.id).await?;
    Ok(Json(CartResponse { cart }))
}

/// POST /cart/items - Add a product (increments quantity when present).
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartResponse>> {
    let quantity = request.quantity.unwrap_or(1);
    if quantity <= 0 {
        return Err(AppError::BadRequest(
            "Quantity must be a positive number".to_owned(),
        ));
    }

    // Surface a clean 404 instead of a foreign-key error
    if ProductRepository::new(state.pool())
        .get(request.product_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Product".to_owned()));
    }

    let repo = CartRepository::new(state.pool());
    repo.add_item(user.id, request.product_id, quantity).await?;

    Ok(Json(CartResponse {
        cart: repo.get_lines(user.id).await?,
    }))
}

/// PUT /cart/items - Set the quantity of a product already in the cart.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn set_quantity(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<SetQuantityRequest>,
) -> Result<Json<CartResponse>> {
    if request.quantity <= 0 {
        return Err(AppError::BadRequest(
            "Quantity must be a positive number".to_owned(),
        ));
    }

    let repo = CartRepository::new(state.pool());
    repo.set_quantity(user.id, request.product_id, request.quantity)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("Cart item".to_owned()),
            other => AppError::Database(other),
        })?;

    Ok(Json(CartResponse {
        cart: repo.get_lines(user.id).await?,
    }))
}

/// DELETE /cart/items - Remove a product; deletes the cart when it empties.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<RemoveItemRequest>,
) -> Result<Json<serde_json::Value>> {
    let repo = CartRepository::new(state.pool());
    let cart_deleted = repo
        .remove_item(user.id, request.product_id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("Cart".to_owned()),
            other => AppError::Database(other),
        })?;

    if cart_deleted {
        return Ok(Json(serde_json::json!({
            "message": "Cart is empty and has been removed",
            "cart": [],
        })));
    }

    let cart = repo.get_lines(user.id).await?;
    Ok(Json(serde_json::json!({
        "message": "Product removed from cart",
        "cart": cart,
    })))
}

/// DELETE /cart - Drop the whole cart.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<serde_json::Value>> {
    CartRepository::new(state.pool()).clear(user.id).await?;
    Ok(Json(serde_json::json!({
        "message": "Cart has been deleted"
    })))
}
