use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Money as a count of minor currency units (cents, pence, etc).
///
/// All arithmetic is exact integer arithmetic; there is no scaling or
/// rounding anywhere in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// create from a minor-unit count
    pub fn from_minor(amount: i64) -> Self {
        Money(amount)
    }

    /// get the underlying minor-unit count
    pub fn as_minor(&self) -> i64 {
        self.0
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// check if strictly positive
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// check if strictly negative
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// maximum of two values
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// truncating division into `parts`, returning (quotient, remainder)
    ///
    /// `quotient * parts + remainder == self` for any `parts >= 1`.
    pub fn div_rem(self, parts: u32) -> (Money, Money) {
        debug_assert!(parts >= 1, "div_rem requires at least one part");
        let parts = i64::from(parts);
        (Money(self.0 / parts), Money(self.0 % parts))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Money {
    fn from(amount: i64) -> Self {
        Money::from_minor(amount)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}
