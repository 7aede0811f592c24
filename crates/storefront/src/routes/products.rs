//! Catalog route handlers: product listing, guest-cart hydration, the
//! featured product, and buyer reviews.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use teknokalakal_core::{CategoryId, ProductId, ReviewId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Product, Review};
use crate::state::AppState;

/// Listing filters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<CategoryId>,
}

/// Guest-cart hydration body: bare product IDs from local storage.
#[derive(Debug, Deserialize)]
pub struct ByIdsRequest {
    pub ids: Vec<ProductId>,
}

/// Review submission body.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: i16,
    #[serde(default)]
    pub comment: String,
}

/// GET /products - All products, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list(query.category)
        .await?;
    Ok(Json(products))
}

/// GET /products/{id} - One product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))?;
    Ok(Json(product))
}

/// POST /products/by-ids - Hydrate a guest cart held in local storage.
///
/// Unknown IDs are skipped rather than erroring: the browser may hold IDs
/// of products delisted since they were added.
#[instrument(skip(state, request), fields(count = request.ids.len()))]
pub async fn by_ids(
    State(state): State<AppState>,
    Json(request): Json<ByIdsRequest>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list_by_ids(&request.ids)
        .await?;
    Ok(Json(products))
}

/// GET /products/featured - The admin-chosen featured product.
///
/// Responds `null` when nothing is featured (or the choice points at a
/// deleted product).
#[instrument(skip(state))]
pub async fn featured(State(state): State<AppState>) -> Result<Json<Option<Product>>> {
    let settings = state.settings().await?;

    let product = match settings.featured_product_id {
        Some(id) => ProductRepository::new(state.pool()).get(id).await?,
        None => None,
    };

    Ok(Json(product))
}

/// GET /products/{id}/reviews - A product's reviews.
#[instrument(skip(state))]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<Review>>> {
    let repo = ProductRepository::new(state.pool());

    if repo.get(id).await?.is_none() {
        return Err(AppError::NotFound("Product".to_owned()));
    }

    Ok(Json(repo.list_reviews(id).await?))
}

/// POST /products/{id}/reviews - Attach a review.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn add_review(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
    Json(request): Json<ReviewRequest>,
) -> Result<impl IntoResponse> {
    if !(1..=5).contains(&request.rating) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5".to_owned(),
        ));
    }

    let repo = ProductRepository::new(state.pool());
    if repo.get(id).await?.is_none() {
        return Err(AppError::NotFound("Product".to_owned()));
    }

    let review = repo
        .add_review(id, user.id, request.rating, request.comment.trim())
        .await?;

    Ok((StatusCode::CREATED, Json(review)))
}

/// DELETE /products/{id}/reviews/{review_id} - Remove one's own review.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_review(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((id, review_id)): Path<(ProductId, ReviewId)>,
) -> Result<Json<serde_json::Value>> {
    let repo = ProductRepository::new(state.pool());

    let review = repo
        .get_review(id, review_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Review".to_owned()))?;

    if review.user_id != user.id {
        return Err(AppError::Forbidden(
            "You are not authorized to delete this review".to_owned(),
        ));
    }

    repo.delete_review(review_id).await?;

    Ok(Json(serde_json::json!({
        "message": "Review deleted successfully"
    })))
}
