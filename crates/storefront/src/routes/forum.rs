//! Forum route handlers: posts, voting, comment threads.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use teknokalakal_core::{CommentId, PostId, VoteKind};

use crate::db::ForumRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Post, PostDetail};
use crate::state::AppState;

/// Post creation body.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

/// Vote body.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub kind: VoteKind,
}

/// Comment body.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

/// GET /forum/posts - All posts with their authors, newest first.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Post>>> {
    let posts = ForumRepository::new(state.pool()).list_posts().await?;
    Ok(Json(posts))
}

/// GET /forum/posts/{id} - One post with votes and comment thread.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<PostId>,
) -> Result<Json<PostDetail>> {
    let detail = ForumRepository::new(state.pool())
        .get_post_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post".to_owned()))?;
    Ok(Json(detail))
}

/// POST /forum/posts - Create a post.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreatePostRequest>,
) -> Result<impl IntoResponse> {
    if request.title.trim().is_empty() || request.content.trim().is_empty() {
        return Err(AppError::BadRequest("Missing required fields".to_owned()));
    }

    let post = ForumRepository::new(state.pool())
        .create_post(user.id, request.title.trim(), request.content.trim())
        .await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /forum/posts/{id}/vote - Cast or flip a vote.
///
/// A user holds at most one vote per post: voting again in the same
/// direction re-records it, voting the other way flips it.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn vote(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<PostId>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<PostDetail>> {
    let repo = ForumRepository::new(state.pool());

    repo.vote(id, user.id, request.kind)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("Post".to_owned()),
            other => AppError::Database(other),
        })?;

    let detail = repo
        .get_post_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post".to_owned()))?;

    Ok(Json(detail))
}

/// DELETE /forum/posts/{id} - Delete one's own post.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<PostId>,
) -> Result<Json<serde_json::Value>> {
    let repo = ForumRepository::new(state.pool());

    let author = repo
        .post_author(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post".to_owned()))?;

    if author != user.id {
        return Err(AppError::Forbidden(
            "You can only delete your own posts".to_owned(),
        ));
    }

    repo.delete_post(id).await?;

    Ok(Json(serde_json::json!({
        "message": "Post deleted successfully"
    })))
}

/// POST /forum/posts/{id}/comments - Reply to a post.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn add_comment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<PostId>,
    Json(request): Json<CommentRequest>,
) -> Result<impl IntoResponse> {
    if request.content.trim().is_empty() {
        return Err(AppError::BadRequest("Content is required".to_owned()));
    }

    let repo = ForumRepository::new(state.pool());

    if repo.post_author(id).await?.is_none() {
        return Err(AppError::NotFound("Post".to_owned()));
    }

    let comment = repo
        .add_comment(id, user.id, request.content.trim())
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// DELETE /forum/posts/{id}/comments/{comment_id} - Delete one's own comment.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_comment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((id, comment_id)): Path<(PostId, CommentId)>,
) -> Result<Json<serde_json::Value>> {
    let repo = ForumRepository::new(state.pool());

    let comment = repo
        .get_comment(id, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment".to_owned()))?;

    if comment.user_id != user.id {
        return Err(AppError::Forbidden(
            "You can only delete your own comments".to_owned(),
        ));
    }

    repo.delete_comment(comment_id).await?;

    Ok(Json(serde_json::json!({
        "message": "Comment deleted successfully"
    })))
}
