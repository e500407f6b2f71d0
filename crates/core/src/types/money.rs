//! Monetary amounts with exact decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount paired with its ISO 4217 currency code.
///
/// Amounts use [`Decimal`] so that line totals and cart totals are exact;
/// two-decimal semantics are the backends' convention, not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g., "USD").
    pub currency_code: String,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub fn zero(currency_code: impl Into<String>) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Scale this unit amount by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            amount: self.amount * Decimal::from(quantity),
            currency_code: self.currency_code.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times_scales_amount() {
        let unit = Money::new(Decimal::new(1250, 2), "USD");
        let total = unit.times(3);
        assert_eq!(total.amount, Decimal::new(3750, 2));
        assert_eq!(total.currency_code, "USD");
    }

    #[test]
    fn test_times_zero_quantity() {
        let unit = Money::new(Decimal::new(999, 2), "EUR");
        assert_eq!(unit.times(0), Money::zero("EUR"));
    }

    #[test]
    fn test_zero() {
        let money = Money::zero("USD");
        assert_eq!(money.amount, Decimal::ZERO);
        assert_eq!(money.currency_code, "USD");
    }
}
