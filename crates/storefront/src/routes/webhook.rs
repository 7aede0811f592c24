//! Payment gateway webhook handler.
//!
//! PayMongo posts events for every payment and checkout session; the order
//! referenced in the event metadata has its payment status moved through an
//! event-type switch. Apart from a bad signature, the endpoint always
//! acknowledges with 200 so the gateway stops retrying - a mishandled event
//! is logged, not bounced.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use secrecy::ExposeSecret;
use tracing::instrument;

use teknokalakal_core::{FailedCode, PaymentStatus};

use crate::db::OrderRepository;
use crate::services::paymongo::{WebhookEnvelope, verify_webhook_signature};
use crate::state::AppState;

/// The header PayMongo signs its webhook posts with.
const SIGNATURE_HEADER: &str = "Paymongo-Signature";

/// The resolved effect of one webhook event on an order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PaymentOutcome {
    status: PaymentStatus,
    description: String,
    failed_code: Option<FailedCode>,
}

/// Map an event type (plus failure details) onto a payment status change.
///
/// Unknown event types map to `None` and are acknowledged without effect.
fn payment_event_outcome(
    event_type: &str,
    failed_code: Option<&str>,
    failed_message: Option<&str>,
) -> Option<PaymentOutcome> {
    let fallback_message = failed_message.unwrap_or("No reason provided");

    let outcome = match event_type {
        "payment.paid" => PaymentOutcome {
            status: PaymentStatus::Paid,
            description: "Payment successfully processed".to_owned(),
            failed_code: None,
        },
        "payment.failed" => {
            let parsed_code = failed_code.and_then(|c| c.parse::<FailedCode>().ok());
            let (status, description) = match parsed_code {
                Some(FailedCode::InsufficientFunds) => (
                    PaymentStatus::InsufficientFunds,
                    "Transaction failed due to insufficient funds".to_owned(),
                ),
                Some(FailedCode::CardDeclined) => (
                    PaymentStatus::Failed,
                    "Card was declined by the issuing bank".to_owned(),
                ),
                Some(FailedCode::ExpiredCard) => {
                    (PaymentStatus::Failed, "Card has expired".to_owned())
                }
                _ => (PaymentStatus::Failed, fallback_message.to_owned()),
            };
            PaymentOutcome {
                status,
                description,
                failed_code: parsed_code,
            }
        }
        "payment.cancelled" => PaymentOutcome {
            status: PaymentStatus::Cancelled,
            description: "Payment was cancelled by the customer or system".to_owned(),
            failed_code: None,
        },
        "payment.refunded" => PaymentOutcome {
            status: PaymentStatus::Refunded,
            description: format!("Refund processed: {fallback_message}"),
            failed_code: None,
        },
        "checkout.cancelled" => PaymentOutcome {
            status: PaymentStatus::CheckoutCancelled,
            description: "Checkout was cancelled before completion".to_owned(),
            failed_code: None,
        },
        "checkout.expired" => PaymentOutcome {
            status: PaymentStatus::CheckoutExpired,
            description: "Checkout session expired".to_owned(),
            failed_code: None,
        },
        _ => return None,
    };

    Some(outcome)
}

fn acknowledge() -> Response {
    Json(serde_json::json!({ "received": true })).into_response()
}

/// POST /webhooks/paymongo - Consume a gateway event.
#[instrument(skip_all)]
pub async fn paymongo(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let secret = state.config().paymongo.webhook_secret.expose_secret();
    if !verify_webhook_signature(secret, signature, &body) {
        tracing::warn!("webhook rejected: bad signature");
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "Invalid signature" })),
        )
            .into_response();
    }

    let envelope: WebhookEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(error = %e, "webhook body did not parse; acknowledging anyway");
            return acknowledge();
        }
    };

    let event_type = envelope.event_type().to_owned();
    let Some(order_id) = envelope.order_id() else {
        tracing::debug!(event_type, "webhook event without order metadata");
        return acknowledge();
    };

    let Some(outcome) =
        payment_event_outcome(&event_type, envelope.failed_code(), envelope.failed_message())
    else {
        tracing::debug!(event_type, "unhandled webhook event type");
        return acknowledge();
    };

    tracing::info!(
        %order_id,
        event_type,
        status = %outcome.status,
        "applying payment event"
    );

    if let Err(e) = OrderRepository::new(state.pool())
        .apply_payment_event(
            order_id,
            outcome.status,
            &outcome.description,
            outcome.failed_code,
        )
        .await
    {
        // Acknowledge regardless: the gateway retrying won't make an
        // unknown order appear, and real database failures are in Sentry.
        tracing::error!(%order_id, error = %e, "failed to apply payment event");
        sentry::capture_error(&e);
    }

    acknowledge()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_paid_event() {
        let outcome = payment_event_outcome("payment.paid", None, None).unwrap();
        assert_eq!(outcome.status, PaymentStatus::Paid);
        assert_eq!(outcome.failed_code, None);
    }

    #[test]
    fn test_failed_event_insufficient_funds() {
        let outcome =
            payment_event_outcome("payment.failed", Some("insufficient_funds"), None).unwrap();
        assert_eq!(outcome.status, PaymentStatus::InsufficientFunds);
        assert_eq!(outcome.failed_code, Some(FailedCode::InsufficientFunds));
        assert_eq!(
            outcome.description,
            "Transaction failed due to insufficient funds"
        );
    }

    #[test]
    fn test_failed_event_card_declined() {
        let outcome =
            payment_event_outcome("payment.failed", Some("card_declined"), Some("declined"))
                .unwrap();
        assert_eq!(outcome.status, PaymentStatus::Failed);
        assert_eq!(outcome.failed_code, Some(FailedCode::CardDeclined));
    }

    #[test]
    fn test_failed_event_unknown_code_uses_gateway_message() {
        let outcome = payment_event_outcome(
            "payment.failed",
            Some("mystery_code"),
            Some("Something went sideways"),
        )
        .unwrap();
        assert_eq!(outcome.status, PaymentStatus::Failed);
        assert_eq!(outcome.failed_code, None);
        assert_eq!(outcome.description, "Something went sideways");
    }

    #[test]
    fn test_failed_event_without_message() {
        let outcome = payment_event_outcome("payment.failed", None, None).unwrap();
        assert_eq!(outcome.description, "No reason provided");
    }

    #[test]
    fn test_refunded_event_carries_message() {
        let outcome =
            payment_event_outcome("payment.refunded", None, Some("Customer request")).unwrap();
        assert_eq!(outcome.status, PaymentStatus::Refunded);
        assert_eq!(outcome.description, "Refund processed: Customer request");
    }

    #[test]
    fn test_checkout_session_events() {
        assert_eq!(
            payment_event_outcome("checkout.cancelled", None, None)
                .unwrap()
                .status,
            PaymentStatus::CheckoutCancelled
        );
        assert_eq!(
            payment_event_outcome("checkout.expired", None, None)
                .unwrap()
                .status,
            PaymentStatus::CheckoutExpired
        );
    }

    #[test]
    fn test_unknown_event_is_ignored() {
        assert!(payment_event_outcome("source.chargeable", None, None).is_none());
    }
}
