//! Canonical cart model.
//!
//! All durable cart state lives in the remote backend; these types are the
//! normalized projection every backend response is reshaped into. Totals are
//! always recomputed from the lines - never trusted from upstream, because
//! the backends disagree on which total/tax fields exist at all.

use serde::{Deserialize, Serialize};

use crate::types::money::Money;

/// One variant-quantity pairing inside a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Backend-assigned line identifier. Absent until the backend has
    /// persisted the line; some backends address lines by variant id and
    /// mirror it here.
    pub line_id: Option<String>,
    /// Merchandise (product variant) identity. Stable across mutations.
    pub variant_id: String,
    /// Merchandise display name.
    pub title: String,
    /// Positive line quantity. A quantity of zero is a removal and is never
    /// persisted as a line.
    pub quantity: u32,
    /// Price per unit.
    pub unit_price: Money,
    /// Denormalized quantity x unit price, same currency as `unit_price`.
    pub line_total: Money,
}

impl CartLine {
    /// Build a line, computing `line_total` from the unit price.
    #[must_use]
    pub fn new(
        line_id: Option<String>,
        variant_id: impl Into<String>,
        title: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        let line_total = unit_price.times(quantity);
        Self {
            line_id,
            variant_id: variant_id.into(),
            title: title.into(),
            quantity,
            unit_price,
            line_total,
        }
    }
}

/// A shopping cart normalized from a backend response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Opaque backend-issued cart handle.
    pub id: String,
    /// Hosted checkout URL, when the backend attaches one to the cart.
    pub checkout_url: Option<String>,
    /// Cart lines.
    pub lines: Vec<CartLine>,
    /// Sum of all line totals, recomputed locally.
    pub total_cost: Money,
}

impl Cart {
    /// Policy default currency for carts with no lines to take one from.
    pub const DEFAULT_CURRENCY: &'static str = "USD";

    /// Assemble a cart from its lines, recomputing the total.
    ///
    /// The cart currency is taken from the first line; a zero-line cart
    /// falls back to [`Self::DEFAULT_CURRENCY`].
    #[must_use]
    pub fn from_lines(
        id: impl Into<String>,
        checkout_url: Option<String>,
        lines: Vec<CartLine>,
    ) -> Self {
        let currency_code = lines
            .first()
            .map_or(Self::DEFAULT_CURRENCY, |line| {
                line.unit_price.currency_code.as_str()
            })
            .to_string();

        let total = lines
            .iter()
            .map(|line| line.line_total.amount)
            .sum::<rust_decimal::Decimal>();

        Self {
            id: id.into(),
            checkout_url,
            lines,
            total_cost: Money::new(total, currency_code),
        }
    }

    /// Locate the line holding the given variant, if any.
    #[must_use]
    pub fn line_for_variant(&self, variant_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.variant_id == variant_id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}
