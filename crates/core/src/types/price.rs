//! Type-safe price representation.
//!
//! The catalog quotes every price in whole rupees; there are no paise
//! anywhere in the data model, so prices are plain non-negative integers
//! rather than decimals.

use serde::{Deserialize, Serialize};

/// A price in whole rupees.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u32);

impl Price {
    /// Create a new price from a rupee amount.
    #[must_use]
    pub const fn new(rupees: u32) -> Self {
        Self(rupees)
    }

    /// Get the amount in whole rupees.
    #[must_use]
    pub const fn rupees(&self) -> u32 {
        self.0
    }

    /// Format with digit grouping for display (e.g. `3,000`).
    ///
    /// The currency symbol is applied at the view layer.
    #[must_use]
    pub fn grouped(&self) -> String {
        group_digits(u64::from(self.0))
    }
}

/// Group a rupee amount with thousands separators.
///
/// Used directly for line and cart totals, which are wider than [`Price`].
#[must_use]
pub fn group_digits(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Mul<u32> for Price {
    type Output = u64;

    /// Line totals can exceed `u32`, so multiplication widens.
    fn mul(self, quantity: u32) -> u64 {
        u64::from(self.0) * u64::from(quantity)
    }
}
