//! Role-gated admin surface.
//!
//! Every handler takes the `RequireAdmin` extractor; there is no separate
//! admin binary because the original system gates by the `role` column on
//! the user record.
//!
//! ```text
//! GET  /admin/orders                      - All orders
//! PUT  /admin/orders/{id}                 - Payment/shipping status + sold cascade
//! POST /admin/orders/{id}/refund          - Approve or reject a refund request
//! GET  /admin/vendors                     - All vendor applications
//! PUT  /admin/vendors/{id}                - Approve or reject an application
//! GET  /admin/settings                    - Shop settings
//! PUT  /admin/settings/shipping-fee       - Set the flat shipping fee
//! PUT  /admin/settings/featured-product   - Choose the featured product
//! ```

pub mod orders;
pub mod settings;
pub mod vendors;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the admin router, nested under `/admin`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(orders::index))
        .route("/orders/{id}", put(orders::update_status))
        .route("/orders/{id}/refund", post(orders::resolve_refund))
        .route("/vendors", get(vendors::index))
        .route("/vendors/{id}", put(vendors::set_status))
        .route("/settings", get(settings::show))
        .route("/settings/shipping-fee", put(settings::set_shipping_fee))
        .route(
            "/settings/featured-product",
            put(settings::set_featured_product),
        )
}
