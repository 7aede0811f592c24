//! Status enums for orders, vendors, users and forum votes.
//!
//! Stored as snake_case TEXT in Postgres; the derives below keep the wire,
//! database and Rust representations in lockstep.

use serde::{Deserialize, Serialize};

/// Payment lifecycle of an order, driven by gateway webhooks and admin action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    InsufficientFunds,
    Cancelled,
    Refunded,
    CheckoutCancelled,
    CheckoutExpired,
}

impl PaymentStatus {
    /// Whether an order in this state contributes to product sold counters.
    #[must_use]
    pub const fn counts_as_sold(self) -> bool {
        matches!(self, Self::Paid)
    }

    /// Whether the buyer may still open a refund request.
    #[must_use]
    pub const fn refundable(self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// Fulfilment lifecycle, mutated by admin action only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ShippingStatus {
    #[default]
    Pending,
    AwaitingCourier,
    Shipped,
    Delivered,
    Cancelled,
}

/// State of a buyer's refund request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// State of a vendor application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum VendorStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Account role. Admins reach the `/admin` surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

/// Direction of a forum vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum VoteKind {
    Upvote,
    Downvote,
}

/// Gateway decline codes carried on failed payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum FailedCode {
    InsufficientFunds,
    CardDeclined,
    ExpiredCard,
    ProcessingError,
}

macro_rules! impl_str_conv {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $text)),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant)),+,
                    _ => Err(format!(concat!("invalid ", stringify!($name), ": {}"), s)),
                }
            }
        }
    };
}

impl_str_conv!(PaymentStatus {
    Pending => "pending",
    Paid => "paid",
    Failed => "failed",
    InsufficientFunds => "insufficient_funds",
    Cancelled => "cancelled",
    Refunded => "refunded",
    CheckoutCancelled => "checkout_cancelled",
    CheckoutExpired => "checkout_expired",
});

impl_str_conv!(ShippingStatus {
    Pending => "pending",
    AwaitingCourier => "awaiting_courier",
    Shipped => "shipped",
    Delivered => "delivered",
    Cancelled => "cancelled",
});

impl_str_conv!(RefundStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

impl_str_conv!(VendorStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

impl_str_conv!(UserRole {
    Admin => "admin",
    User => "user",
});

impl_str_conv!(VoteKind {
    Upvote => "upvote",
    Downvote => "downvote",
});

impl_str_conv!(FailedCode {
    InsufficientFunds => "insufficient_funds",
    CardDeclined => "card_declined",
    ExpiredCard => "expired_card",
    ProcessingError => "processing_error",
});

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_roundtrip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Failed,
            PaymentStatus::InsufficientFunds,
            PaymentStatus::Cancelled,
            PaymentStatus::Refunded,
            PaymentStatus::CheckoutCancelled,
            PaymentStatus::CheckoutExpired,
        ] {
            let text = status.to_string();
            assert_eq!(text.parse::<PaymentStatus>().unwrap(), status);
        }
        assert!("definitely-not-a-status".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_serde_matches_display() {
        let json = serde_json::to_string(&ShippingStatus::AwaitingCourier).unwrap();
        assert_eq!(json, "\"awaiting_courier\"");
        assert_eq!(
            ShippingStatus::AwaitingCourier.to_string(),
            "awaiting_courier"
        );
    }

    #[test]
    fn test_only_paid_counts_as_sold() {
        assert!(PaymentStatus::Paid.counts_as_sold());
        assert!(!PaymentStatus::Pending.counts_as_sold());
        assert!(!PaymentStatus::Refunded.counts_as_sold());
    }

    #[test]
    fn test_only_paid_is_refundable() {
        assert!(PaymentStatus::Paid.refundable());
        assert!(!PaymentStatus::Failed.refundable());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
        assert_eq!(UserRole::default(), UserRole::User);
        assert_eq!(VendorStatus::default(), VendorStatus::Pending);
    }
}
