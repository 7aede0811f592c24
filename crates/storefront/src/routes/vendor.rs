//! Vendor route handlers: onboarding applications, the vendor's own
//! catalog, and the orders containing their products.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use teknokalakal_core::{CategoryId, Money, PaymentStatus, ProductId, VendorId};

use crate::db::products::ProductInput;
use crate::db::{OrderRepository, ProductRepository, VendorRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::order::Order;
use crate::models::product::{ImageRef, Product};
use crate::models::vendor::{BusinessInfo, VendorApplication};
use crate::state::AppState;

// =============================================================================
// Applications
// =============================================================================

/// Vendor application submission body.
#[derive(Debug, Deserialize)]
pub struct ApplicationRequest {
    #[serde(flatten)]
    pub business: BusinessInfo,
    #[serde(default)]
    pub certifications: Vec<ImageRef>,
}

/// GET /vendor/applications - The caller's applications, newest first.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_applications(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<VendorApplication>>> {
    let applications = VendorRepository::new(state.pool())
        .list_by_user(user.id)
        .await?;
    Ok(Json(applications))
}

/// POST /vendor/applications - Submit an application.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn create_application(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<ApplicationRequest>,
) -> Result<impl IntoResponse> {
    if request.business.name.trim().is_empty() {
        return Err(AppError::BadRequest("Business name is required".to_owned()));
    }

    let application = VendorRepository::new(state.pool())
        .create(user.id, &request.business, &request.certifications)
        .await?;

    tracing::info!(application_id = %application.id, "vendor application submitted");

    Ok((StatusCode::CREATED, Json(application)))
}

/// DELETE /vendor/applications/{id} - Withdraw one's own application.
///
/// Certification images are destroyed at the media host first; if that
/// fails the record stays so nothing is orphaned.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_application(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<VendorId>,
) -> Result<Json<serde_json::Value>> {
    let repo = VendorRepository::new(state.pool());

    let application = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Application".to_owned()))?;

    if application.user_id != user.id {
        return Err(AppError::Forbidden(
            "You are not authorized to delete this application".to_owned(),
        ));
    }

    state
        .cloudinary()
        .destroy_all(&application.certifications)
        .await?;

    if !repo.delete_owned(id, user.id).await? {
        return Err(AppError::NotFound("Application".to_owned()));
    }

    Ok(Json(serde_json::json!({
        "message": "Application and images deleted successfully"
    })))
}

// =============================================================================
// Vendor catalog
// =============================================================================

/// Listing create/update body.
#[derive(Debug, Deserialize)]
pub struct ListingRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price in centavos.
    pub price: Money,
    pub stock: i32,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub properties: Option<serde_json::Value>,
    /// Images already removed in the editor, to destroy at the media host.
    #[serde(default)]
    pub images_to_delete: Vec<ImageRef>,
}

impl ListingRequest {
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("Title is required".to_owned()));
        }
        if self.price.is_free() {
            return Err(AppError::BadRequest(
                "Price must be a positive amount".to_owned(),
            ));
        }
        if self.stock < 0 {
            return Err(AppError::BadRequest("Stock cannot be negative".to_owned()));
        }
        Ok(())
    }
}

/// GET /vendor/products - The caller's listings, newest first.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_products(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list_by_vendor(user.id)
        .await?;
    Ok(Json(products))
}

/// POST /vendor/products - Create a listing.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn create_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<ListingRequest>,
) -> Result<impl IntoResponse> {
    request.validate()?;

    let product = ProductRepository::new(state.pool())
        .create(
            user.id,
            &ProductInput {
                title: request.title.trim().to_owned(),
                description: request.description.clone(),
                price: request.price,
                stock: request.stock,
                images: request.images.clone(),
                category_id: request.category_id,
                properties: request.properties.clone(),
            },
        )
        .await?;

    // Editor-discarded uploads are cleaned up after the listing is safe
    if !request.images_to_delete.is_empty() {
        state
            .cloudinary()
            .destroy_all(&request.images_to_delete)
            .await?;
    }

    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /vendor/products/{id} - Update one's own listing.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn update_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
    Json(request): Json<ListingRequest>,
) -> Result<Json<Product>> {
    request.validate()?;

    let repo = ProductRepository::new(state.pool());
    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))?;

    if existing.vendor_id != user.id {
        return Err(AppError::Forbidden(
            "You are not authorized to edit this product".to_owned(),
        ));
    }

    if !request.images_to_delete.is_empty() {
        state
            .cloudinary()
            .destroy_all(&request.images_to_delete)
            .await?;
    }

    let images = merge_images(&existing.images, &request.images, &request.images_to_delete);

    let product = repo
        .update(
            id,
            &ProductInput {
                title: request.title.trim().to_owned(),
                description: request.description.clone(),
                price: request.price,
                stock: request.stock,
                images,
                category_id: request.category_id,
                properties: request.properties.clone(),
            },
        )
        .await?;

    Ok(Json(product))
}

/// DELETE /vendor/products/{id} - Delist one's own product.
///
/// Product images are destroyed at the media host first; a failure there
/// leaves the listing in place.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<Json<serde_json::Value>> {
    let repo = ProductRepository::new(state.pool());

    let product = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))?;

    if product.vendor_id != user.id {
        return Err(AppError::NotFound("Product".to_owned()));
    }

    state.cloudinary().destroy_all(&product.images).await?;

    if !repo.delete_owned(id, user.id).await? {
        return Err(AppError::NotFound("Product".to_owned()));
    }

    Ok(Json(serde_json::json!({
        "message": "Product and images deleted successfully"
    })))
}

// =============================================================================
// Vendor orders
// =============================================================================

/// Vendor orders filters.
#[derive(Debug, Deserialize)]
pub struct VendorOrdersQuery {
    pub status: Option<PaymentStatus>,
}

/// A vendor's product with its sold tally over the returned orders.
#[derive(Debug, Serialize)]
pub struct VendorProductSummary {
    pub id: ProductId,
    pub title: String,
    pub sold: i64,
}

/// Vendor orders response body.
#[derive(Debug, Serialize)]
pub struct VendorOrdersResponse {
    pub orders: Vec<Order>,
    pub products: Vec<VendorProductSummary>,
}

/// GET /vendor/orders - Orders containing the caller's products, plus
/// per-product sold tallies over those orders.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<VendorOrdersQuery>,
) -> Result<Json<VendorOrdersResponse>> {
    let products = ProductRepository::new(state.pool())
        .list_by_vendor(user.id)
        .await?;

    if products.is_empty() {
        return Ok(Json(VendorOrdersResponse {
            orders: Vec::new(),
            products: Vec::new(),
        }));
    }

    let product_ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();
    let orders = OrderRepository::new(state.pool())
        .list_containing_products(&product_ids, query.status)
        .await?;

    let tallies = sold_tallies(&orders);
    let products = products
        .into_iter()
        .map(|p| VendorProductSummary {
            sold: tallies.get(&p.id).copied().unwrap_or(0),
            id: p.id,
            title: p.title,
        })
        .collect();

    Ok(Json(VendorOrdersResponse { orders, products }))
}

/// Sum line-item quantities per product across the given orders.
fn sold_tallies(orders: &[Order]) -> HashMap<ProductId, i64> {
    let mut tallies = HashMap::new();
    for order in orders {
        for item in &order.line_items {
            if let Some(product_id) = item.product_id {
                *tallies.entry(product_id).or_insert(0) += item.quantity;
            }
        }
    }
    tallies
}

/// Keep existing images minus the deleted ones, then append genuinely new
/// uploads. Matching is by public ID, falling back to the link for images
/// that never had one.
fn merge_images(existing: &[ImageRef], incoming: &[ImageRef], to_delete: &[ImageRef]) -> Vec<ImageRef> {
    fn same(a: &ImageRef, b: &ImageRef) -> bool {
        match (&a.public_id, &b.public_id) {
            (Some(a_id), Some(b_id)) => a_id == b_id,
            _ => a.link == b.link,
        }
    }

    let mut merged: Vec<ImageRef> = existing
        .iter()
        .filter(|image| !to_delete.iter().any(|gone| same(image, gone)))
        .cloned()
        .collect();

    for image in incoming {
        if !merged.iter().any(|kept| same(kept, image)) {
            merged.push(image.clone());
        }
    }

    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn image(public_id: &str) -> ImageRef {
        ImageRef {
            public_id: Some(public_id.to_owned()),
            link: format!("https://images.example/{public_id}.jpg"),
        }
    }

    #[test]
    fn test_merge_images_removes_deleted() {
        let existing = vec![image("a"), image("b"), image("c")];
        let merged = merge_images(&existing, &[], &[image("b")]);
        assert_eq!(merged, vec![image("a"), image("c")]);
    }

    #[test]
    fn test_merge_images_appends_new_without_duplicates() {
        let existing = vec![image("a")];
        let incoming = vec![image("a"), image("d")];
        let merged = merge_images(&existing, &incoming, &[]);
        assert_eq!(merged, vec![image("a"), image("d")]);
    }

    #[test]
    fn test_merge_images_falls_back_to_link() {
        let legacy = ImageRef {
            public_id: None,
            link: "https://images.example/legacy.jpg".to_owned(),
        };
        let merged = merge_images(&[legacy.clone()], &[legacy.clone()], &[]);
        assert_eq!(merged.len(), 1);

        let merged = merge_images(&[legacy.clone()], &[], &[legacy]);
        assert!(merged.is_empty());
    }
}
