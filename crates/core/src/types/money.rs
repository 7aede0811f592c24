//! Monetary amounts in Philippine pesos.
//!
//! The payment gateway bills in centavos, so amounts are stored as integer
//! centavos end to end and only converted to decimal pesos at the edges
//! (display, admin input).

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A peso amount held as integer centavos.
///
/// ## Examples
///
/// ```
/// use teknokalakal_core::Money;
///
/// let price = Money::from_centavos(12_550);
/// assert_eq!(price.to_string(), "PHP 125.50");
/// assert_eq!(price * 3, Money::from_centavos(37_650));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Create an amount from integer centavos.
    #[must_use]
    pub const fn from_centavos(centavos: i64) -> Self {
        Self(centavos)
    }

    /// The amount in centavos.
    #[must_use]
    pub const fn as_centavos(&self) -> i64 {
        self.0
    }

    /// The amount as decimal pesos.
    #[must_use]
    pub fn as_pesos(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Create an amount from decimal pesos, rounding to the centavo.
    #[must_use]
    pub fn from_pesos(pesos: Decimal) -> Self {
        let centavos = (pesos * Decimal::new(100, 0)).round();
        Self(centavos.to_i64().unwrap_or(i64::MAX))
    }

    /// Saturating addition.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// True when the amount is zero or negative.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.0 <= 0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PHP {}", self.as_pesos())
    }
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Mul<i64> for Money {
    type Output = Self;

    fn mul(self, quantity: i64) -> Self {
        Self(self.0 * quantity)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

// SQLx support (with postgres feature): stored as BIGINT centavos.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Money {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Money {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let centavos = <i64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(centavos))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Money {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_centavo_roundtrip() {
        let m = Money::from_centavos(2_500);
        assert_eq!(m.as_centavos(), 2_500);
        assert_eq!(m.as_pesos(), Decimal::new(25, 0));
    }

    #[test]
    fn test_from_pesos_rounds_to_centavo() {
        let m = Money::from_pesos(Decimal::new(125_506, 3)); // 125.506
        assert_eq!(m.as_centavos(), 12_551);
        let m = Money::from_pesos(Decimal::new(125_504, 3)); // 125.504
        assert_eq!(m.as_centavos(), 12_550);
    }

    #[test]
    fn test_line_total() {
        let unit = Money::from_centavos(9_900);
        assert_eq!(unit * 4, Money::from_centavos(39_600));
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::from_centavos(100), Money::from_centavos(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_centavos(350));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_centavos(12_550).to_string(), "PHP 125.50");
        assert_eq!(Money::ZERO.to_string(), "PHP 0.00");
    }

    #[test]
    fn test_is_free() {
        assert!(Money::ZERO.is_free());
        assert!(!Money::from_centavos(1).is_free());
    }

    #[test]
    fn test_serde_transparent() {
        let m = Money::from_centavos(2_500);
        assert_eq!(serde_json::to_string(&m).unwrap(), "2500");
    }
}
