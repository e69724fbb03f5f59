//! Read-only view of the shopper's cart, as handed over by the checkout.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One cart line. Ids and quantities are coerced to integers on the way in,
/// so `"12"`, `12`, and `12.0` all read as `12`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(deserialize_with = "crate::lenient::int")]
    pub article_id: i64,
    #[serde(deserialize_with = "crate::lenient::int")]
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    #[serde(default)]
    pub total: Option<Decimal>,
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl CartSnapshot {
    #[must_use]
    pub fn new(total: Decimal, items: Vec<CartItem>) -> Self {
        Self {
            total: Some(total),
            items,
        }
    }

    /// Returns the total when the cart can be priced: a positive total and at
    /// least one line. A zero total counts as absent.
    #[must_use]
    pub fn priceable_total(&self) -> Option<Decimal> {
        if self.items.is_empty() {
            return None;
        }
        self.total.filter(|t| t.is_sign_positive() && !t.is_zero())
    }
}
