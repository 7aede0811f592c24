//! Order domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use teknokalakal_core::{
    Address, FailedCode, Money, OrderId, PaymentStatus, ProductId, RefundStatus, ShippingStatus,
    UserId,
};

/// One line of an order, snapshotted at checkout time.
///
/// Deliberately not foreign-keyed: the order must keep describing what was
/// bought even if the product is later edited or delisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// The product this line was built from, kept for sold-counter updates.
    pub product_id: Option<ProductId>,
    pub name: String,
    pub description: String,
    /// Unit amount in centavos.
    pub amount: Money,
    /// ISO 4217 code; always "PHP" today.
    pub currency: String,
    pub quantity: i64,
    /// Cover image at checkout time.
    #[serde(default)]
    pub image: Option<String>,
}

impl LineItem {
    /// Amount x quantity.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.amount * self.quantity
    }
}

/// An order tracked through the payment and shipping lifecycles.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Contact details captured at checkout.
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Client-generated reference printed on the success/cancel pages.
    pub reference_number: String,
    pub shipping_fee: Money,
    pub address: Address,
    pub line_items: Vec<LineItem>,
    pub payment_status: PaymentStatus,
    pub shipping_status: ShippingStatus,
    /// Human-readable explanation of the current payment status.
    pub status_description: String,
    /// Gateway decline code, set only for failed payments.
    pub failed_code: Option<FailedCode>,
    pub refund_requested: bool,
    pub refund_status: RefundStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Grand total: all line subtotals (the shipping fee is its own line).
    #[must_use]
    pub fn total(&self) -> Money {
        self.line_items.iter().map(LineItem::subtotal).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_subtotal() {
        let line = LineItem {
            product_id: Some(ProductId::new(1)),
            name: "Hand tractor".to_owned(),
            description: "Two-wheel tractor".to_owned(),
            amount: Money::from_centavos(450_000),
            currency: "PHP".to_owned(),
            quantity: 2,
            image: None,
        };
        assert_eq!(line.subtotal(), Money::from_centavos(900_000));
    }
}
