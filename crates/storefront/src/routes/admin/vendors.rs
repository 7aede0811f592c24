//! Admin vendor application management.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use teknokalakal_core::{VendorId, VendorStatus};

use crate::db::VendorRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::VendorApplication;
use crate::state::AppState;

/// Approval body.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: VendorStatus,
}

/// GET /admin/vendors - All applications, newest first.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<Vec<VendorApplication>>> {
    let applications = VendorRepository::new(state.pool()).list_all().await?;
    Ok(Json(applications))
}

/// PUT /admin/vendors/{id} - Approve or reject an application.
#[instrument(skip(state, admin, request), fields(admin_id = %admin.id))]
pub async fn set_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<VendorId>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<VendorApplication>> {
    if request.status == VendorStatus::Pending {
        return Err(AppError::BadRequest(
            "Applications can only be approved or rejected".to_owned(),
        ));
    }

    let application = VendorRepository::new(state.pool())
        .set_status(id, request.status)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("Application".to_owned()),
            other => AppError::Database(other),
        })?;

    tracing::info!(application_id = %id, status = %application.status, "vendor application resolved");

    Ok(Json(application))
}
