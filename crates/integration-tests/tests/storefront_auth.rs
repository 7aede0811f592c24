//! Integration tests for signup, login and session handling.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront server running (cargo run -p teknokalakal-storefront)
//!
//! Run with: cargo test -p teknokalakal-integration-tests -- --ignored

use reqwest::StatusCode;
use uuid::Uuid;

use teknokalakal_integration_tests::{base_url, client, login_fresh_user};

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_signup_login_me_roundtrip() {
    let client = client();
    let email = login_fresh_user(&client).await;

    let resp = client
        .get(format!("{}/auth/me", base_url()))
        .send()
        .await
        .expect("me request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.expect("me body");
    assert_eq!(body["email"], email);
    assert_eq!(body["role"], "user");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_me_requires_session() {
    let resp = client()
        .get(format!("{}/auth/me", base_url()))
        .send()
        .await
        .expect("me request failed");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_duplicate_email_conflicts() {
    let base = base_url();
    let client = client();
    let suffix = Uuid::new_v4().simple().to_string();
    let email = format!("dup-{suffix}@example.com");

    let signup = |username: String| {
        let client = client.clone();
        let email = email.clone();
        let base = base.clone();
        async move {
            client
                .post(format!("{base}/auth/signup"))
                .json(&serde_json::json!({
                    "name": "Dup Tester",
                    "email": email,
                    "username": username,
                    "password": "integration-test-password",
                }))
                .send()
                .await
                .expect("signup request failed")
        }
    };

    let first = signup(format!("dup-a-{}", &suffix[..8])).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    // Same email, different username: the email collision must win
    let second = signup(format!("dup-b-{}", &suffix[..8])).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = second.json().await.expect("conflict body");
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_wrong_password_is_unauthorized() {
    let client = client();
    let email = login_fresh_user(&client).await;

    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .json(&serde_json::json!({
            "email": email,
            "password": "definitely-not-the-password",
        }))
        .send()
        .await
        .expect("login request failed");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_logout_clears_session() {
    let client = client();
    login_fresh_user(&client).await;
    let base = base_url();

    let resp = client
        .post(format!("{base}/auth/logout"))
        .send()
        .await
        .expect("logout request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base}/auth/me"))
        .send()
        .await
        .expect("me request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
