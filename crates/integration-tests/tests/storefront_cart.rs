//! Integration tests for the cart lifecycle.
//!
//! Assumes a seeded catalog (cargo run -p teknokalakal-cli -- seed) so at
//! least one product exists.
//!
//! Run with: cargo test -p teknokalakal-integration-tests -- --ignored

use reqwest::StatusCode;

use teknokalakal_integration_tests::{base_url, client, login_fresh_user};

/// Fetch any product ID from the public catalog.
async fn any_product_id(client: &reqwest::Client) -> i64 {
    let resp = client
        .get(format!("{}/products", base_url()))
        .send()
        .await
        .expect("products request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let products: serde_json::Value = resp.json().await.expect("products body");
    products[0]["id"]
        .as_i64()
        .expect("seeded catalog should have at least one product")
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_cart_requires_session() {
    let resp = client()
        .get(format!("{}/cart", base_url()))
        .send()
        .await
        .expect("cart request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_add_increments_existing_line() {
    let client = client();
    login_fresh_user(&client).await;
    let base = base_url();
    let product_id = any_product_id(&client).await;

    for _ in 0..2 {
        let resp = client
            .post(format!("{base}/cart/items"))
            .json(&serde_json::json!({ "product_id": product_id, "quantity": 1 }))
            .send()
            .await
            .expect("add request failed");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart request failed");
    let body: serde_json::Value = resp.json().await.expect("cart body");

    assert_eq!(body["cart"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["cart"][0]["quantity"], 2);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_zero_quantity_is_rejected() {
    let client = client();
    login_fresh_user(&client).await;
    let base = base_url();
    let product_id = any_product_id(&client).await;

    let resp = client
        .put(format!("{base}/cart/items"))
        .json(&serde_json::json!({ "product_id": product_id, "quantity": 0 }))
        .send()
        .await
        .expect("set-quantity request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_removing_last_item_deletes_cart() {
    let client = client();
    login_fresh_user(&client).await;
    let base = base_url();
    let product_id = any_product_id(&client).await;

    let resp = client
        .post(format!("{base}/cart/items"))
        .json(&serde_json::json!({ "product_id": product_id }))
        .send()
        .await
        .expect("add request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .delete(format!("{base}/cart/items"))
        .json(&serde_json::json!({ "product_id": product_id }))
        .send()
        .await
        .expect("remove request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = resp.json().await.expect("remove body");
    assert_eq!(body["message"], "Cart is empty and has been removed");

    // A fresh read shows no cart at all
    let resp = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart request failed");
    let body: serde_json::Value = resp.json().await.expect("cart body");
    assert_eq!(body["cart"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_guest_cart_hydration() {
    let client = client();
    let base = base_url();
    let product_id = any_product_id(&client).await;

    // No session: local-storage IDs are hydrated through /products/by-ids
    let resp = client
        .post(format!("{base}/products/by-ids"))
        .json(&serde_json::json!({ "ids": [product_id, 999_999] }))
        .send()
        .await
        .expect("by-ids request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let products: serde_json::Value = resp.json().await.expect("by-ids body");
    // The unknown ID is skipped, not an error
    assert_eq!(products.as_array().map(Vec::len), Some(1));
    assert_eq!(products[0]["id"], product_id);
}
