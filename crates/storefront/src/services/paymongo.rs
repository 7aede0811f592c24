//! PayMongo API client.
//!
//! Creates hosted checkout sessions and verifies webhook signatures. The
//! gateway owns the whole payment UI; this client only hands it line items
//! and reads events back.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use teknokalakal_core::OrderId;

use crate::config::PaymongoConfig;

/// PayMongo API base URL.
const BASE_URL: &str = "https://api.paymongo.com/v1";

/// Payment methods offered on the hosted checkout page.
const PAYMENT_METHOD_TYPES: &[&str] = &["card", "gcash", "paymaya", "billease"];

type HmacSha256 = Hmac<Sha256>;

/// Errors that can occur when interacting with the PayMongo API.
#[derive(Debug, Error)]
pub enum PaymongoError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response or build the client.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// One line of a checkout session, amounts in centavos.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutLineItem {
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub images: Vec<String>,
    pub name: String,
    pub quantity: i64,
}

/// Billing details forwarded to the hosted checkout page.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutBilling {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// city / line1 / line2 / postal_code / state, PayMongo's address shape.
    pub address: serde_json::Value,
}

/// Everything needed to open a checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutSessionParams {
    pub order_id: OrderId,
    pub reference_number: String,
    pub description: String,
    pub line_items: Vec<CheckoutLineItem>,
    pub billing: CheckoutBilling,
    pub success_url: String,
    pub cancel_url: String,
}

/// A created checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub id: String,
    pub checkout_url: String,
}

/// PayMongo API client.
#[derive(Clone)]
pub struct PaymongoClient {
    client: reqwest::Client,
}

impl PaymongoClient {
    /// Create a new PayMongo client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &PaymongoConfig) -> Result<Self, PaymongoError> {
        let mut headers = HeaderMap::new();

        // PayMongo uses Basic auth with the secret key as username, empty password
        let credentials = BASE64.encode(format!("{}:", config.secret_key.expose_secret()));
        let auth_value = format!("Basic {credentials}");
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| PaymongoError::Parse(format!("Invalid API key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Create a hosted checkout session.
    ///
    /// The order ID travels in the session metadata and comes back on every
    /// webhook event for that payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails or the response is malformed.
    pub async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<CheckoutSession, PaymongoError> {
        let url = format!("{BASE_URL}/checkout_sessions");

        let body = serde_json::json!({
            "data": {
                "attributes": {
                    "line_items": params.line_items,
                    "billing": params.billing,
                    "customer_email": params.billing.email,
                    "payment_method_types": PAYMENT_METHOD_TYPES,
                    "metadata": {
                        "order_id": params.order_id.to_string(),
                    },
                    "description": params.description,
                    "reference_number": params.reference_number,
                    "success_url": params.success_url,
                    "cancel_url": params.cancel_url,
                    "show_line_items": true,
                    "send_email_receipt": true,
                }
            }
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaymongoError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let created: CheckoutSessionResponse = response
            .json()
            .await
            .map_err(|e| PaymongoError::Parse(e.to_string()))?;

        Ok(CheckoutSession {
            id: created.data.id,
            checkout_url: created.data.attributes.checkout_url,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CheckoutSessionResponse {
    data: CheckoutSessionData,
}

#[derive(Debug, Deserialize)]
struct CheckoutSessionData {
    id: String,
    attributes: CheckoutSessionAttributes,
}

#[derive(Debug, Deserialize)]
struct CheckoutSessionAttributes {
    checkout_url: String,
}

// =============================================================================
// Webhook payloads
// =============================================================================

/// A decoded webhook event.
///
/// The envelope nests twice: the outer `data` is the event resource, the
/// inner `data` the payment/session it concerns. Everything interesting is
/// optional on the wire, so the struct mirrors that.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    pub data: WebhookEventResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventResource {
    pub attributes: WebhookEventAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventAttributes {
    /// Event type, e.g. `payment.paid`, `checkout.expired`.
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: Option<WebhookResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookResource {
    pub attributes: Option<WebhookResourceAttributes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookResourceAttributes {
    #[serde(default)]
    pub metadata: Option<WebhookMetadata>,
    #[serde(default)]
    pub failed_code: Option<String>,
    #[serde(default)]
    pub failed_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookMetadata {
    #[serde(default)]
    pub order_id: Option<String>,
}

impl WebhookEnvelope {
    /// The event type string.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.data.attributes.event_type
    }

    fn resource_attributes(&self) -> Option<&WebhookResourceAttributes> {
        self.data.attributes.data.as_ref()?.attributes.as_ref()
    }

    /// The order this event concerns, if the metadata carries one.
    #[must_use]
    pub fn order_id(&self) -> Option<OrderId> {
        self.resource_attributes()?
            .metadata
            .as_ref()?
            .order_id
            .as_ref()?
            .parse()
            .ok()
    }

    /// The gateway decline code, for failed payments.
    #[must_use]
    pub fn failed_code(&self) -> Option<&str> {
        self.resource_attributes()?.failed_code.as_deref()
    }

    /// The gateway's human-readable failure message.
    #[must_use]
    pub fn failed_message(&self) -> Option<&str> {
        self.resource_attributes()?.failed_message.as_deref()
    }
}

// =============================================================================
// Signature verification
// =============================================================================

/// Verify a `Paymongo-Signature` header against the raw request body.
///
/// The header carries `t=<timestamp>,te=<test sig>,li=<live sig>`; the
/// signature is HMAC-SHA256 over `"{timestamp}.{body}"`. Either the test or
/// the live signature may match, depending on the key mode.
#[must_use]
pub fn verify_webhook_signature(secret: &str, header: &str, payload: &[u8]) -> bool {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("te" | "li", value)) => signatures.push(value),
            _ => {}
        }
    }

    let (Some(timestamp), false) = (timestamp, signatures.is_empty()) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);

    let computed = hex::encode(mac.finalize().into_bytes());
    signatures.iter().any(|sig| *sig == computed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "whsk_test_fixed_secret";

    fn sign(timestamp: &str, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_live_signature_passes() {
        let payload = br#"{"data":{}}"#;
        let sig = sign("1722470400", payload);
        let header = format!("t=1722470400,te=deadbeef,li={sig}");
        assert!(verify_webhook_signature(SECRET, &header, payload));
    }

    #[test]
    fn test_valid_test_signature_passes() {
        let payload = br#"{"data":{}}"#;
        let sig = sign("1722470400", payload);
        let header = format!("t=1722470400,te={sig}");
        assert!(verify_webhook_signature(SECRET, &header, payload));
    }

    #[test]
    fn test_tampered_payload_fails() {
        let sig = sign("1722470400", br#"{"data":{}}"#);
        let header = format!("t=1722470400,li={sig}");
        assert!(!verify_webhook_signature(
            SECRET,
            &header,
            br#"{"data":{"evil":true}}"#
        ));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let payload = br#"{"data":{}}"#;
        let sig = sign("1722470400", payload);
        let header = format!("t=1722470400,li={sig}");
        assert!(!verify_webhook_signature("other-secret", &header, payload));
    }

    #[test]
    fn test_malformed_header_fails() {
        assert!(!verify_webhook_signature(SECRET, "", b"{}"));
        assert!(!verify_webhook_signature(SECRET, "t=123", b"{}"));
        assert!(!verify_webhook_signature(SECRET, "li=abc", b"{}"));
    }

    #[test]
    fn test_envelope_extraction() {
        let body = serde_json::json!({
            "data": {
                "attributes": {
                    "type": "payment.failed",
                    "data": {
                        "attributes": {
                            "metadata": { "order_id": "17" },
                            "failed_code": "insufficient_funds",
                            "failed_message": "Not enough balance"
                        }
                    }
                }
            }
        });
        let envelope: WebhookEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.event_type(), "payment.failed");
        assert_eq!(envelope.order_id(), Some(OrderId::new(17)));
        assert_eq!(envelope.failed_code(), Some("insufficient_funds"));
        assert_eq!(envelope.failed_message(), Some("Not enough balance"));
    }

    #[test]
    fn test_envelope_without_metadata() {
        let body = serde_json::json!({
            "data": { "attributes": { "type": "checkout.expired" } }
        });
        let envelope: WebhookEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.event_type(), "checkout.expired");
        assert_eq!(envelope.order_id(), None);
    }
}
