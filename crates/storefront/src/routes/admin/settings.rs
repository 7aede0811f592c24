//! Admin shop settings management.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use teknokalakal_core::{Money, ProductId};

use crate::db::settings::ShopSettings;
use crate::db::{ProductRepository, SettingsRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Shipping fee body, centavos.
#[derive(Debug, Deserialize)]
pub struct ShippingFeeRequest {
    pub shipping_fee: Money,
}

/// Featured product body; `null` clears the choice.
#[derive(Debug, Deserialize)]
pub struct FeaturedProductRequest {
    pub product_id: Option<ProductId>,
}

/// GET /admin/settings - The current settings row.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<ShopSettings>> {
    let settings = SettingsRepository::new(state.pool()).get().await?;
    Ok(Json(settings))
}

/// PUT /admin/settings/shipping-fee - Set the flat shipping fee.
#[instrument(skip(state, admin, request), fields(admin_id = %admin.id))]
pub async fn set_shipping_fee(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<ShippingFeeRequest>,
) -> Result<Json<ShopSettings>> {
    if request.shipping_fee.as_centavos() < 0 {
        return Err(AppError::BadRequest(
            "Shipping fee cannot be negative".to_owned(),
        ));
    }

    let repo = SettingsRepository::new(state.pool());
    repo.set_shipping_fee(request.shipping_fee).await?;
    state.invalidate_settings().await;

    Ok(Json(repo.get().await?))
}

/// PUT /admin/settings/featured-product - Choose (or clear) the featured product.
#[instrument(skip(state, admin, request), fields(admin_id = %admin.id))]
pub async fn set_featured_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<FeaturedProductRequest>,
) -> Result<Json<ShopSettings>> {
    if let Some(product_id) = request.product_id
        && ProductRepository::new(state.pool())
            .get(product_id)
            .await?
            .is_none()
    {
        return Err(AppError::NotFound("Product".to_owned()));
    }

    let repo = SettingsRepository::new(state.pool());
    repo.set_featured_product(request.product_id).await?;
    state.invalidate_settings().await;

    Ok(Json(repo.get().await?))
}
