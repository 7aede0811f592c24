//! Direct-upload signing for the media host.
//!
//! Browsers upload product and certification images straight to Cloudinary;
//! this endpoint signs the parameter set they intend to upload with so the
//! API secret never leaves the server.

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::cloudinary::SignedParams;
use crate::state::AppState;

/// Signing request body.
#[derive(Debug, Deserialize)]
pub struct SignRequest {
    /// The exact parameters the browser will send to the upload endpoint.
    pub params_to_sign: BTreeMap<String, serde_json::Value>,
}

/// POST /uploads/sign - Sign a direct-upload parameter set.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn sign(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<SignRequest>,
) -> Result<Json<SignedParams>> {
    let signed = state.cloudinary().sign_upload_params(&request.params_to_sign);
    Ok(Json(signed))
}
