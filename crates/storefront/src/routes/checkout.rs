//! Checkout route handlers.
//!
//! Builds a line-item snapshot from the caller's cart, inserts a pending
//! order, and hands the line items to the PayMongo hosted checkout. The
//! order is created before the gateway call so a webhook can never arrive
//! for an order that does not exist yet.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use teknokalakal_core::{Address, Money};

use crate::db::orders::NewOrder;
use crate::db::{CartRepository, OrderRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::cart::CartLine;
use crate::models::order::LineItem;
use crate::services::paymongo::{CheckoutBilling, CheckoutLineItem, CheckoutSessionParams};
use crate::state::AppState;

/// Fallback description for products listed without one.
const NO_DESCRIPTION: &str = "No description available";

/// Checkout request body.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub reference_number: String,
    pub address: Address,
}

/// Checkout response body.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub message: String,
    pub checkout_url: String,
}

/// POST /checkout - Create a pending order and a hosted checkout session.
#[instrument(skip(state, user, request), fields(user_id = %user.id, reference = %request.reference_number))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    if request.name.trim().is_empty() || request.email.trim().is_empty() {
        return Err(AppError::BadRequest("Name and email are required".to_owned()));
    }
    if request.reference_number.trim().is_empty() {
        return Err(AppError::BadRequest("Reference number is required".to_owned()));
    }
    if !request.address.is_shippable() {
        return Err(AppError::BadRequest(
            "A complete shipping address is required".to_owned(),
        ));
    }

    let cart = CartRepository::new(state.pool()).get_lines(user.id).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Invalid or empty cart data".to_owned()));
    }

    let shipping_fee = state.settings().await?.shipping_fee;
    let line_items = build_line_items(&cart, shipping_fee);

    let order = OrderRepository::new(state.pool())
        .create(&NewOrder {
            user_id: user.id,
            name: request.name.trim().to_owned(),
            email: request.email.trim().to_owned(),
            phone: request.phone.trim().to_owned(),
            reference_number: request.reference_number.trim().to_owned(),
            shipping_fee,
            address: request.address.clone(),
            line_items: line_items.clone(),
        })
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Database(other),
        })?;

    let base_url = &state.config().base_url;
    let reference = order.reference_number.clone();

    let session = state
        .paymongo()
        .create_checkout_session(&CheckoutSessionParams {
            order_id: order.id,
            reference_number: reference.clone(),
            description: format!("Order #{reference} - Customer: {}", order.name),
            line_items: line_items.iter().map(to_gateway_line).collect(),
            billing: CheckoutBilling {
                name: order.name.clone(),
                email: order.email.clone(),
                phone: order.phone.clone(),
                address: serde_json::json!({
                    "city": order.address.municipality,
                    "country": "PH",
                    "line1": order.address.barangay,
                    "line2": order.address.street_address,
                    "postal_code": order.address.postal_code,
                    "state": order.address.province,
                }),
            },
            success_url: format!("{base_url}/success?reference={reference}"),
            cancel_url: format!("{base_url}/cancel?reference={reference}"),
        })
        .await?;

    tracing::info!(order_id = %order.id, session_id = %session.id, "checkout session created");

    Ok(Json(CheckoutResponse {
        message: "Checkout session created successfully".to_owned(),
        checkout_url: session.checkout_url,
    }))
}

/// Shipping fee response body.
#[derive(Debug, Serialize)]
pub struct ShippingFeeResponse {
    pub shipping_fee: Money,
}

/// GET /shipping-fee - The flat shipping fee in centavos.
#[instrument(skip(state))]
pub async fn shipping_fee(State(state): State<AppState>) -> Result<Json<ShippingFeeResponse>> {
    let settings = state.settings().await.map_err(|e| match e {
        crate::db::RepositoryError::NotFound => AppError::NotFound("Shipping fee".to_owned()),
        other => AppError::Database(other),
    })?;

    Ok(Json(ShippingFeeResponse {
        shipping_fee: settings.shipping_fee,
    }))
}

/// Snapshot cart lines into order line items, shipping fee last.
fn build_line_items(cart: &[CartLine], shipping_fee: Money) -> Vec<LineItem> {
    let mut items: Vec<LineItem> = cart
        .iter()
        .map(|line| LineItem {
            product_id: Some(line.product.id),
            name: line.product.title.clone(),
            description: line
                .product
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| NO_DESCRIPTION.to_owned()),
            amount: line.product.price,
            currency: "PHP".to_owned(),
            quantity: i64::from(line.quantity),
            image: line.product.cover_image().map(str::to_owned),
        })
        .collect();

    if !shipping_fee.is_free() {
        items.push(LineItem {
            product_id: None,
            name: "Shipping fee".to_owned(),
            description: "Flat-rate shipping".to_owned(),
            amount: shipping_fee,
            currency: "PHP".to_owned(),
            quantity: 1,
            image: None,
        });
    }

    items
}

/// Convert a snapshot line into the gateway's line-item shape.
fn to_gateway_line(item: &LineItem) -> CheckoutLineItem {
    CheckoutLineItem {
        amount: item.amount.as_centavos(),
        currency: item.currency.clone(),
        description: item.description.clone(),
        images: item.image.clone().into_iter().collect(),
        name: item.name.clone(),
        quantity: item.quantity,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use teknokalakal_core::{ProductId, UserId};

    use crate::models::product::{ImageRef, Product};

    fn product(id: i32, price: i64, description: Option<&str>) -> Product {
        Product {
            id: ProductId::new(id),
            vendor_id: UserId::new(1),
            title: format!("Product {id}"),
            description: description.map(str::to_owned),
            price: Money::from_centavos(price),
            stock: 10,
            sold: 0,
            images: vec![ImageRef {
                public_id: Some(format!("products/{id}")),
                link: format!("https://images.example/{id}.jpg"),
            }],
            category_id: None,
            properties: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_line_items_snapshots_cart() {
        let cart = vec![
            CartLine {
                product: product(1, 12_500, Some("Tilapia fingerling net")),
                quantity: 3,
            },
            CartLine {
                product: product(2, 450_000, None),
                quantity: 1,
            },
        ];

        let items = build_line_items(&cart, Money::from_centavos(2_500));

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].amount, Money::from_centavos(12_500));
        assert_eq!(items[0].description, "Tilapia fingerling net");
        // Missing descriptions get the placeholder
        assert_eq!(items[1].description, NO_DESCRIPTION);
        // Shipping fee rides along as its own line
        assert_eq!(items[2].name, "Shipping fee");
        assert_eq!(items[2].product_id, None);
        assert_eq!(items[2].amount, Money::from_centavos(2_500));
    }

    #[test]
    fn test_build_line_items_skips_free_shipping() {
        let cart = vec![CartLine {
            product: product(1, 10_000, None),
            quantity: 1,
        }];
        let items = build_line_items(&cart, Money::ZERO);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_gateway_line_conversion() {
        let cart = vec![CartLine {
            product: product(7, 9_900, Some("Rice thresher belt")),
            quantity: 2,
        }];
        let items = build_line_items(&cart, Money::ZERO);
        let gateway = to_gateway_line(&items[0]);

        assert_eq!(gateway.amount, 9_900);
        assert_eq!(gateway.currency, "PHP");
        assert_eq!(gateway.quantity, 2);
        assert_eq!(gateway.images, vec!["https://images.example/7.jpg"]);
    }
}
