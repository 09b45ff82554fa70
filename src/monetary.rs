use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MonetaryError {
    /// The decimal amount doesn't fit in a whole number of cents.
    #[error("{0} is out of range for a monetary amount")]
    OutOfRange(Decimal),
}

/// A US dollar amount, stored as a whole number of cents.
///
/// I decided to keep amounts as integer cents rather than decimals: every
/// amount the bank handles is cent-denominated, sums are exact, and
/// sub-cent values can only appear through `percentage`, which floors them
/// away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Monetary(i64);

impl Monetary {
    pub const ZERO: Self = Self(0);
    pub const ONE_CENT: Self = Self(1);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Saturates, so the most negative amount maps to the most positive one.
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    /// `rate` percent of this amount, floored to a whole cent.
    pub fn percentage(self, rate: Decimal) -> Self {
        let cents = (Decimal::from(self.0) * rate / Decimal::ONE_HUNDRED).floor();
        match cents.to_i64() {
            Some(cents) => Self(cents),
            None if cents.is_sign_negative() => Self(i64::MIN),
            None => Self(i64::MAX),
        }
    }
}

impl TryFrom<Decimal> for Monetary {
    type Error = MonetaryError;

    // Sub-cent digits are truncated toward zero, so 10.019 becomes 10.01.
    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.trunc().to_i64())
            .map(Self)
            .ok_or(MonetaryError::OutOfRange(amount))
    }
}

impl fmt::Display for Monetary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, cents / 100, cents % 100)
    }
}

impl Neg for Monetary {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl Add for Monetary {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Monetary {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Monetary {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Monetary {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Monetary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Monetary> for Monetary {
    fn sum<I: Iterator<Item = &'a Monetary>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{Monetary, MonetaryError};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_from_decimal_truncates_cents() {
        for (amount, want) in vec![
            (dec!(10.01), 1001),
            (dec!(-10.01), -1001),
            (dec!(0.019), 1),
            (dec!(-0.019), -1),
            (dec!(0.009), 0),
            (dec!(1000), 100_000),
        ] {
            assert_eq!(Ok(Monetary::from_cents(want)), Monetary::try_from(amount));
        }
    }

    #[test]
    fn test_from_decimal_out_of_range() {
        let very_big_number = Decimal::from_str("70000000000000000000000000000").unwrap();
        assert_eq!(
            Err(MonetaryError::OutOfRange(very_big_number)),
            Monetary::try_from(very_big_number)
        );
    }

    #[test]
    fn test_arithmetic() {
        let a = Monetary::from_cents(1001);
        let b = Monetary::from_cents(250);

        assert_eq!(Monetary::from_cents(1251), a + b);
        assert_eq!(Monetary::from_cents(751), a - b);
        assert_eq!(Monetary::from_cents(-1001), -a);
        assert!(b < a);
        assert!(-a < Monetary::ZERO);

        let total: Monetary = vec![a, b, -b].iter().sum();
        assert_eq!(a, total);
    }

    #[test]
    fn test_percentage_floors() {
        for (cents, rate, want) in vec![
            (100_000, dec!(1), 1000),
            (100_000, dec!(0.5), 500),
            // 0.5% a year compounded monthly: 41.666.. cents floors to 41.
            (100_000, dec!(0.5) / dec!(12), 41),
            (1, dec!(0.5), 0),
            // Flooring goes toward negative infinity.
            (-100, dec!(0.5), -1),
        ] {
            assert_eq!(
                Monetary::from_cents(want),
                Monetary::from_cents(cents).percentage(rate)
            );
        }
    }

    #[test]
    fn test_bounds() {
        let max = Monetary::from_cents(i64::MAX);
        let min = Monetary::from_cents(i64::MIN);

        assert_eq!(None, max.checked_add(Monetary::ONE_CENT));
        assert_eq!(None, min.checked_add(-Monetary::ONE_CENT));
        assert_eq!(Some(max), max.checked_add(Monetary::ZERO));
        assert_eq!(max, max.saturating_add(max));
        assert_eq!(max, min.abs());
        assert_eq!(max, -min);
    }

    #[test]
    fn test_display() {
        for (cents, want) in vec![
            (0, "$0.00"),
            (1, "$0.01"),
            (99, "$0.99"),
            (1001, "$10.01"),
            (98_999, "$989.99"),
            (-1, "-$0.01"),
            (-1001, "-$10.01"),
        ] {
            assert_eq!(want, Monetary::from_cents(cents).to_string());
        }
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(dec!(10.01), Monetary::from_cents(1001).to_decimal());
        assert_eq!(dec!(-0.05), Monetary::from_cents(-5).to_decimal());
    }
}
