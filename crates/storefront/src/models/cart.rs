//! Cart domain types.
//!
//! A user holds at most one cart; the cart row disappears when its last
//! item is removed. Guest carts live in browser local storage and never
//! reach these types.

use serde::Serialize;

use teknokalakal_core::Money;

use super::product::Product;

/// One cart entry joined with its product.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: i32,
}

impl CartLine {
    /// Price of this line (unit price x quantity).
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.product.price * i64::from(self.quantity)
    }
}
