//! Rupee amounts with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal` carrying at most two fractional
//! digits (paise). Values are validated, never rounded.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of fractional digits of the minor unit (paise).
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Represents a non-floating rupee amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub Decimal);

impl Money {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns the inner decimal.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns true if the amount is representable in whole paise.
    #[must_use]
    pub fn fits_minor_unit(self) -> bool {
        has_minor_unit_precision(self.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Returns true if `amount` has no digits beyond paise.
///
/// Trailing zeros are ignored, so `10.500` is accepted.
#[must_use]
pub fn has_minor_unit_precision(amount: Decimal) -> bool {
    amount.normalize().scale() <= MINOR_UNIT_SCALE
}

/// Formats an amount with the rupee sign and Indian digit grouping.
///
/// `100000` becomes `₹1,00,000`; fractional paise are kept when present.
#[must_use]
pub fn format_inr(amount: Decimal) -> String {
    let normalized = amount.normalize();
    let negative = normalized.is_sign_negative() && !normalized.is_zero();
    let text = normalized.abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let mut grouped = String::new();
    let digits: Vec<char> = whole.chars().collect();
    let len = digits.len();
    for (i, ch) in digits.iter().enumerate() {
        let remaining = len - i;
        if i > 0 && (remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0)) {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('₹');
    out.push_str(&grouped);
    if let Some(f) = fraction {
        out.push('.');
        out.push_str(&f);
        if f.len() == 1 {
            out.push('0');
        }
    }
    out
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_inr(self.0))
    }
}
