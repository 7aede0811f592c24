//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (database ping)
//!
//! # Auth
//! POST /auth/signup                - Create an account
//! POST /auth/login                 - Establish a session
//! POST /auth/logout                - Clear the session
//! GET  /auth/me                    - The session user
//! PUT  /auth/profile               - Update name, username, address
//!
//! # Catalog
//! GET  /products                   - Product listing (?category=)
//! GET  /products/featured          - The featured product (nullable)
//! GET  /products/{id}              - Product detail
//! POST /products/by-ids            - Guest-cart hydration
//! GET  /products/{id}/reviews      - A product's reviews
//! POST /products/{id}/reviews      - Add a review (auth)
//! DELETE /products/{id}/reviews/{review_id} - Delete one's own review
//!
//! # Cart (auth)
//! GET    /cart                     - The session user's cart
//! POST   /cart/items               - Add a product
//! PUT    /cart/items               - Set a quantity
//! DELETE /cart/items               - Remove a product (cart dies when empty)
//! DELETE /cart                     - Drop the cart
//!
//! # Checkout
//! POST /checkout                   - Pending order + hosted checkout URL (auth)
//! GET  /shipping-fee               - The flat shipping fee
//!
//! # Orders (auth)
//! GET  /orders                     - The session user's orders
//! GET  /orders/{id}                - Order detail (owner or admin)
//! POST /orders/{id}/refund         - Request a refund (paid orders only)
//!
//! # Vendor (auth)
//! GET    /vendor/applications      - The caller's applications
//! POST   /vendor/applications      - Submit an application
//! DELETE /vendor/applications/{id} - Withdraw (destroys images first)
//! GET    /vendor/products          - The caller's listings
//! POST   /vendor/products          - Create a listing
//! PUT    /vendor/products/{id}     - Update a listing
//! DELETE /vendor/products/{id}     - Delist (destroys images first)
//! GET    /vendor/orders            - Orders containing the caller's products
//!
//! # Forum
//! GET    /forum/posts              - All posts
//! POST   /forum/posts              - Create a post (auth)
//! GET    /forum/posts/{id}         - Post with votes and comments
//! PUT    /forum/posts/{id}/vote    - Cast or flip a vote (auth)
//! DELETE /forum/posts/{id}         - Delete one's own post
//! POST   /forum/posts/{id}/comments            - Reply (auth)
//! DELETE /forum/posts/{id}/comments/{comment_id} - Delete one's own reply
//!
//! # Integrations
//! POST /webhooks/paymongo          - Payment gateway events (signed)
//! POST /uploads/sign               - Sign a direct upload (auth)
//!
//! # Admin (role-gated, see `admin`)
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod forum;
pub mod orders;
pub mod products;
pub mod uploads;
pub mod vendor;
pub mod webhook;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::middleware::{auth_rate_limiter, checkout_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
///
/// Login and signup get the strict rate limiter; session reads don't.
pub fn auth_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .layer(auth_rate_limiter());

    Router::new()
        .merge(limited)
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/profile", put(auth::update_profile))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/by-ids", post(products::by_ids))
        .route("/{id}", get(products::show))
        .route(
            "/{id}/reviews",
            get(products::list_reviews).post(products::add_review),
        )
        .route("/{id}/reviews/{review_id}", delete(products::delete_review))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route(
            "/items",
            post(cart::add_item)
                .put(cart::set_quantity)
                .delete(cart::remove_item),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/refund", post(orders::request_refund))
}

/// Create the vendor routes router.
pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/applications", get(vendor::list_applications).post(vendor::create_application))
        .route("/applications/{id}", delete(vendor::delete_application))
        .route("/products", get(vendor::list_products).post(vendor::create_product))
        .route(
            "/products/{id}",
            put(vendor::update_product).delete(vendor::delete_product),
        )
        .route("/orders", get(vendor::list_orders))
}

/// Create the forum routes router.
pub fn forum_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(forum::index).post(forum::create))
        .route("/posts/{id}", get(forum::show).delete(forum::delete))
        .route("/posts/{id}/vote", put(forum::vote))
        .route("/posts/{id}/comments", post(forum::add_comment))
        .route(
            "/posts/{id}/comments/{comment_id}",
            delete(forum::delete_comment),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route(
            "/checkout",
            post(checkout::create).layer(checkout_rate_limiter()),
        )
        .route("/shipping-fee", get(checkout::shipping_fee))
        .nest("/orders", order_routes())
        .nest("/vendor", vendor_routes())
        .nest("/forum", forum_routes())
        .route("/webhooks/paymongo", post(webhook::paymongo))
        .route("/uploads/sign", post(uploads::sign))
        .nest("/admin", admin::routes())
}
