//! Money and quantity arithmetic.
//!
//! Amounts are stored as signed counts of minor currency units (two decimal
//! places), so every aggregation in the workspace is exact integer math. The
//! backend transmits amounts as decimal numbers; (de)serialization converts at
//! the boundary and nowhere else.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DomainError, DomainResult};

/// A monetary amount in minor units (e.g. 123456 = 1234.56).
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Amount from a raw minor-unit count.
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Amount from whole major units (e.g. `from_major(40)` is 40.00).
    pub const fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Convert a decimal number from the wire. Values are rounded to the
    /// nearest minor unit; non-finite or out-of-range input is rejected.
    pub fn try_from_major_f64(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::validation("amount must be a finite number"));
        }
        let minor = (value * 100.0).round();
        if minor < i64::MIN as f64 || minor > i64::MAX as f64 {
            return Err(DomainError::validation(format!(
                "amount out of range: {value}"
            )));
        }
        Ok(Self(minor as i64))
    }

    /// Decimal representation for the wire.
    pub fn as_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// `self − other`, floored at zero. Receivable and remaining-payment
    /// figures never go negative; overpayment is not modeled.
    pub fn sub_floored(self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }

    /// `self` as a share of `whole`, rounded to the nearest whole percent.
    /// Zero when `whole` is zero or negative. May exceed 100.
    pub fn percent_of(self, whole: Money) -> i64 {
        if whole.0 <= 0 {
            return 0;
        }
        let scaled = self.0 as i128 * 100;
        let w = whole.0 as i128;
        let half = w / 2;
        let adjusted = if scaled >= 0 {
            scaled + half
        } else {
            scaled - half
        };
        (adjusted / w) as i64
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl Mul<Quantity> for Money {
    type Output = Money;

    fn mul(self, rhs: Quantity) -> Money {
        Money(self.0 * rhs.0 as i64)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_major_f64())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Money::try_from_major_f64(value).map_err(serde::de::Error::custom)
    }
}

/// A count of physical units (materials, stock). Always non-negative.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub const fn new(units: u32) -> Self {
        Self(units)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Quantity {
        Quantity(iter.map(|q| q.0).sum())
    }
}
