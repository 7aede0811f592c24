//! Cloudinary media host client.
//!
//! Browsers upload images straight to Cloudinary; this client only signs
//! their upload parameters and destroys images the storefront no longer
//! references (delisted products, withdrawn vendor applications).

use std::collections::BTreeMap;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::CloudinaryConfig;
use crate::models::product::ImageRef;

/// Cloudinary API base URL.
const BASE_URL: &str = "https://api.cloudinary.com/v1_1";

/// Errors that can occur when interacting with the Cloudinary API.
#[derive(Debug, Error)]
pub enum CloudinaryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// A signed set of upload parameters for the browser.
#[derive(Debug, Clone, Serialize)]
pub struct SignedParams {
    pub signature: String,
    pub api_key: String,
    pub cloud_name: String,
}

/// Cloudinary API client.
#[derive(Clone)]
pub struct CloudinaryClient {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: SecretString,
}

impl CloudinaryClient {
    /// Create a new Cloudinary client.
    #[must_use]
    pub fn new(config: &CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        }
    }

    /// Sign a browser-supplied parameter set for a direct upload.
    ///
    /// The browser sends the parameters it intends to upload with (folder,
    /// timestamp, transformations); the signature authorizes exactly that
    /// set and nothing else.
    #[must_use]
    pub fn sign_upload_params(&self, params: &BTreeMap<String, serde_json::Value>) -> SignedParams {
        let signature = sign_request(params, self.api_secret.expose_secret());
        SignedParams {
            signature,
            api_key: self.api_key.clone(),
            cloud_name: self.cloud_name.clone(),
        }
    }

    /// Destroy one image by public ID.
    ///
    /// Cloudinary reports "not found" as a success result, which suits a
    /// cleanup path fine.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn destroy(&self, public_id: &str) -> Result<(), CloudinaryError> {
        let url = format!("{BASE_URL}/{}/image/destroy", self.cloud_name);
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let mut params = BTreeMap::new();
        params.insert(
            "public_id".to_owned(),
            serde_json::Value::String(public_id.to_owned()),
        );
        params.insert(
            "timestamp".to_owned(),
            serde_json::Value::String(timestamp.clone()),
        );
        let signature = sign_request(&params, self.api_secret.expose_secret());

        let body = DestroyRequest {
            public_id,
            timestamp: &timestamp,
            api_key: &self.api_key,
            signature: &signature,
            signature_algorithm: "sha256",
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            let message = response.text().await.unwrap_or_default();
            return Err(CloudinaryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Destroy every image in the list that carries a public ID.
    ///
    /// Stops at the first failure so the caller can refuse to delete the
    /// database record while images would be left behind.
    ///
    /// # Errors
    ///
    /// Returns the first API error encountered.
    pub async fn destroy_all(&self, images: &[ImageRef]) -> Result<(), CloudinaryError> {
        for image in images {
            if let Some(public_id) = &image.public_id {
                tracing::debug!(public_id, "destroying image at media host");
                self.destroy(public_id).await?;
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct DestroyRequest<'a> {
    public_id: &'a str,
    timestamp: &'a str,
    api_key: &'a str,
    signature: &'a str,
    signature_algorithm: &'a str,
}

/// Build the string Cloudinary expects to be signed: sorted `key=value`
/// pairs joined by `&`, arrays flattened with commas.
fn signature_base(params: &BTreeMap<String, serde_json::Value>) -> String {
    params
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
                other => other.to_string(),
            };
            format!("{key}={rendered}")
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// SHA-256 request signature over the parameter string plus the API secret.
fn sign_request(params: &BTreeMap<String, serde_json::Value>, api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(signature_base(params).as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, serde_json::Value)]) -> BTreeMap<String, serde_json::Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[test]
    fn test_signature_base_sorts_keys() {
        let params = params(&[
            ("timestamp", serde_json::json!("1722470400")),
            ("folder", serde_json::json!("products")),
        ]);
        assert_eq!(
            signature_base(&params),
            "folder=products&timestamp=1722470400"
        );
    }

    #[test]
    fn test_signature_base_flattens_arrays() {
        let params = params(&[("tags", serde_json::json!(["fishing", "nets"]))]);
        assert_eq!(signature_base(&params), "tags=fishing,nets");
    }

    #[test]
    fn test_signature_base_renders_numbers() {
        let params = params(&[("timestamp", serde_json::json!(1_722_470_400))]);
        assert_eq!(signature_base(&params), "timestamp=1722470400");
    }

    #[test]
    fn test_sign_request_is_deterministic() {
        let params = params(&[("folder", serde_json::json!("products"))]);
        let a = sign_request(&params, "secret-a");
        let b = sign_request(&params, "secret-a");
        assert_eq!(a, b);
        // 32-byte SHA-256 digest in hex
        assert_eq!(a.len(), 64);

        let c = sign_request(&params, "secret-b");
        assert_ne!(a, c);
    }
}
