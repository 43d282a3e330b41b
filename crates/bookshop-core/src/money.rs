//! # Money Module
//!
//! Provides the `Money` type for prices and order totals.
//!
//! Every amount in the bookshop is stored as an integer count of minor
//! currency units (`*_mu` columns): `price_mu = 860` means 8.60 in the
//! shop's currency. No floating point is involved anywhere.
//!
//! ## Usage
//! ```rust
//! use bookshop_core::money::Money;
//!
//! let paperback = Money::from_minor(860);
//! let total = paperback * 2 + Money::from_minor(132);
//! assert_eq!(total.minor(), 1852);
//! assert_eq!(total.to_string(), "18.52");
//! ```
//!
//! The operators saturate at `i64::MIN`/`i64::MAX` instead of overflowing.
//! Use [`Money::checked_add`] or [`Money::checked_mul`] to detect that case.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

/// A monetary value in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor remainder, always non-negative.
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Renders as `major.minor`; currency symbols are left to the host app.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Money {
    /// Sum, or `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(minor) => Some(Money(minor)),
            None => None,
        }
    }

    /// Price times quantity, or `None` on overflow.
    #[inline]
    pub const fn checked_mul(self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(minor) => Some(Money(minor)),
            None => None,
        }
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(860);
        assert_eq!(money.minor(), 860);
        assert_eq!(money.major(), 8);
        assert_eq!(money.minor_part(), 60);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(132).to_string(), "1.32");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_minor(-250).to_string(), "-2.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_quantity_and_sum() {
        let lines = vec![Money::from_minor(860) * 2, Money::from_minor(132) * 3];
        let total: Money = lines.into_iter().sum();
        assert_eq!(total.minor(), 2116);
    }

    #[test]
    fn test_overflow_saturates() {
        let huge = Money::from_minor(i64::MAX / 2 + 1);
        assert_eq!((huge * 2).minor(), i64::MAX);
        assert_eq!((huge + huge).minor(), i64::MAX);
        assert_eq!((Money::from_minor(i64::MIN) * 2).minor(), i64::MIN);

        let mut total = huge;
        total += huge;
        assert_eq!(total.minor(), i64::MAX);

        let sum: Money = vec![huge, huge, huge].into_iter().sum();
        assert_eq!(sum.minor(), i64::MAX);
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::from_minor(860);
        assert_eq!(price.checked_mul(3), Some(Money::from_minor(2580)));
        assert_eq!(price.checked_add(price), Some(Money::from_minor(1720)));

        assert_eq!(Money::from_minor(i64::MAX).checked_mul(2), None);
        assert_eq!(Money::from_minor(i64::MAX).checked_add(price), None);
    }
}
