//! Integration tests for vendor onboarding and catalog management.
//!
//! Run with: cargo test -p teknokalakal-integration-tests -- --ignored

use reqwest::StatusCode;

use teknokalakal_integration_tests::{base_url, client, login_fresh_user};

fn application_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Dagupan Agri Supply",
        "description": "Farm tools and aquaculture supplies",
        "address": {
            "street_address": "45 Fernandez Ave",
            "barangay": "Poblacion",
            "municipality": "Dagupan",
            "province": "Pangasinan",
            "postal_code": "2400",
        },
        "phone": "09181234567",
        "email": "store@dagupanagri.ph",
        "certifications": [],
    })
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_application_lifecycle() {
    let client = client();
    login_fresh_user(&client).await;
    let base = base_url();

    // Fresh accounts have no applications
    let resp = client
        .get(format!("{base}/vendor/applications"))
        .send()
        .await
        .expect("applications request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.expect("applications body");
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    // Submit; status starts pending
    let resp = client
        .post(format!("{base}/vendor/applications"))
        .json(&application_body())
        .send()
        .await
        .expect("submit request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let application: serde_json::Value = resp.json().await.expect("application body");
    assert_eq!(application["status"], "pending");
    let id = application["id"].as_i64().expect("application id");

    // Withdraw
    let resp = client
        .delete(format!("{base}/vendor/applications/{id}"))
        .send()
        .await
        .expect("withdraw request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_application_requires_business_name() {
    let client = client();
    login_fresh_user(&client).await;

    let mut body = application_body();
    body["name"] = serde_json::json!("");

    let resp = client
        .post(format!("{}/vendor/applications", base_url()))
        .json(&body)
        .send()
        .await
        .expect("submit request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_listing_crud_is_owner_scoped() {
    let owner = client();
    login_fresh_user(&owner).await;
    let base = base_url();

    // Create a listing
    let resp = owner
        .post(format!("{base}/vendor/products"))
        .json(&serde_json::json!({
            "title": "Bolo knife, carbon steel",
            "description": "Hand-forged clearing bolo",
            "price": 85_000,
            "stock": 12,
            "images": [],
        }))
        .send()
        .await
        .expect("create listing request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: serde_json::Value = resp.json().await.expect("listing body");
    let id = product["id"].as_i64().expect("product id");

    // The listing shows up in the vendor's own list
    let resp = owner
        .get(format!("{base}/vendor/products"))
        .send()
        .await
        .expect("vendor products request failed");
    let listings: serde_json::Value = resp.json().await.expect("vendor products body");
    assert!(
        listings
            .as_array()
            .expect("array")
            .iter()
            .any(|p| p["id"].as_i64() == Some(id))
    );

    // Someone else cannot edit it
    let stranger = client();
    login_fresh_user(&stranger).await;
    let resp = stranger
        .put(format!("{base}/vendor/products/{id}"))
        .json(&serde_json::json!({
            "title": "Hijacked listing",
            "price": 1,
            "stock": 0,
        }))
        .send()
        .await
        .expect("update listing request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // The owner can delist
    let resp = owner
        .delete(format!("{base}/vendor/products/{id}"))
        .send()
        .await
        .expect("delete listing request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_listing_price_must_be_positive() {
    let client = client();
    login_fresh_user(&client).await;

    let resp = client
        .post(format!("{}/vendor/products", base_url()))
        .json(&serde_json::json!({
            "title": "Free sample",
            "price": 0,
            "stock": 1,
        }))
        .send()
        .await
        .expect("create listing request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_vendor_orders_empty_without_products() {
    let client = client();
    login_fresh_user(&client).await;

    let resp = client
        .get(format!("{}/vendor/orders", base_url()))
        .send()
        .await
        .expect("vendor orders request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.expect("vendor orders body");
    assert_eq!(body["orders"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["products"].as_array().map(Vec::len), Some(0));
}
