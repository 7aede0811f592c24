//! Integration tests for TeknoKalakal.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p teknokalakal-cli -- migrate storefront
//!
//! # Start the server
//! cargo run -p teknokalakal-storefront
//!
//! # Run integration tests
//! cargo test -p teknokalakal-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_auth` - Signup/login/session flows
//! - `storefront_cart` - Cart lifecycle, including delete-when-empty
//! - `storefront_orders` - Checkout, webhook and refund flows
//! - `storefront_forum` - Posts, voting and comments

use reqwest::Client;
use uuid::Uuid;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client with a cookie store, so sessions persist across
/// requests the way a browser would hold them.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Sign up and log in a throwaway account, returning its email.
///
/// # Panics
///
/// Panics if signup or login fails.
pub async fn login_fresh_user(client: &Client) -> String {
    let base = base_url();
    let suffix = Uuid::new_v4().simple().to_string();
    let email = format!("it-{suffix}@example.com");

    let resp = client
        .post(format!("{base}/auth/signup"))
        .json(&serde_json::json!({
            "name": "Integration Tester",
            "email": email,
            "username": format!("it-{}", &suffix[..12]),
            "password": "integration-test-password",
        }))
        .send()
        .await
        .expect("signup request failed");
    assert!(
        resp.status().is_success(),
        "signup failed: {}",
        resp.status()
    );

    let resp = client
        .post(format!("{base}/auth/login"))
        .json(&serde_json::json!({
            "email": email,
            "password": "integration-test-password",
        }))
        .send()
        .await
        .expect("login request failed");
    assert!(resp.status().is_success(), "login failed: {}", resp.status());

    email
}
