//! Integration tests for forum posts, voting and comments.
//!
//! Run with: cargo test -p teknokalakal-integration-tests -- --ignored

use reqwest::StatusCode;

use teknokalakal_integration_tests::{base_url, client, login_fresh_user};

/// Create a post and return its ID.
async fn create_post(client: &reqwest::Client, title: &str) -> i64 {
    let resp = client
        .post(format!("{}/forum/posts", base_url()))
        .json(&serde_json::json!({
            "title": title,
            "content": "Anyone tried this on a small bangus pond?",
        }))
        .send()
        .await
        .expect("create post request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: serde_json::Value = resp.json().await.expect("post body");
    body["id"].as_i64().expect("post id")
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_post_requires_title_and_content() {
    let client = client();
    login_fresh_user(&client).await;

    let resp = client
        .post(format!("{}/forum/posts", base_url()))
        .json(&serde_json::json!({ "title": "No content here", "content": "" }))
        .send()
        .await
        .expect("create post request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_vote_flip_keeps_single_vote() {
    let client = client();
    login_fresh_user(&client).await;
    let base = base_url();
    let post_id = create_post(&client, "Vote flip test").await;

    // Upvote, then flip to a downvote
    for kind in ["upvote", "downvote"] {
        let resp = client
            .put(format!("{base}/forum/posts/{post_id}/vote"))
            .json(&serde_json::json!({ "kind": kind }))
            .send()
            .await
            .expect("vote request failed");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = client
        .get(format!("{base}/forum/posts/{post_id}"))
        .send()
        .await
        .expect("post detail request failed");
    let body: serde_json::Value = resp.json().await.expect("post detail body");

    // One vote total; the flip decremented the upvote it replaced
    assert_eq!(body["upvotes"], 0);
    assert_eq!(body["downvotes"], 1);
    assert_eq!(body["votes"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_comment_thread_roundtrip() {
    let client = client();
    login_fresh_user(&client).await;
    let base = base_url();
    let post_id = create_post(&client, "Comment thread test").await;

    let resp = client
        .post(format!("{base}/forum/posts/{post_id}/comments"))
        .json(&serde_json::json!({ "content": "Works fine in brackish water." }))
        .send()
        .await
        .expect("comment request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let comment: serde_json::Value = resp.json().await.expect("comment body");
    let comment_id = comment["id"].as_i64().expect("comment id");

    let resp = client
        .delete(format!("{base}/forum/posts/{post_id}/comments/{comment_id}"))
        .send()
        .await
        .expect("delete comment request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_cannot_delete_someone_elses_post() {
    let author = client();
    login_fresh_user(&author).await;
    let post_id = create_post(&author, "Ownership test").await;

    let stranger = client();
    login_fresh_user(&stranger).await;

    let resp = stranger
        .delete(format!("{}/forum/posts/{post_id}", base_url()))
        .send()
        .await
        .expect("delete post request failed");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
