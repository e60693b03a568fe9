//! Value Objects for the storefront

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Money value object. Single-currency; amounts are kept exact and rounded
/// to cents only when a total is reported.
///
/// Arithmetic is unchecked. Prices are capped at
/// [`MAX_PRICE`](crate::domain::aggregates::medicine::MAX_PRICE) on entry,
/// which keeps any cart total well inside `Decimal`'s range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self { Self(amount) }
    pub fn amount(&self) -> Decimal { self.0 }

    /// Rounds half away from zero to two decimal places.
    pub fn rounded(&self) -> Money {
        Money(self.0.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn multiply(&self, qty: Quantity) -> Money { Money(self.0 * Decimal::from(qty.value())) }

    pub fn discounted(&self, rate: DiscountRate) -> Money { *self - self.discount_for(rate) }

    pub fn discount_for(&self, rate: DiscountRate) -> Money {
        Money(self.0 * rate.percent() / Decimal::ONE_HUNDRED)
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money { Money(self.0 + rhs.0) }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money { Money(self.0 - rhs.0) }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money { iter.fold(Money::ZERO, Add::add) }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self { Self(amount) }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:.2}", self.0) }
}

/// Percentage discount carried by a deal, clamped to `0..=100`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscountRate(Decimal);

impl DiscountRate {
    pub const NONE: DiscountRate = DiscountRate(Decimal::ZERO);

    pub fn from_percent(percent: Decimal) -> Self {
        Self(percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
    }

    /// Lenient parse used at pricing time: anything unreadable is no discount.
    pub fn parse_or_none(text: &str) -> Self { text.parse().unwrap_or(Self::NONE) }

    pub fn percent(&self) -> Decimal { self.0 }
    pub fn is_zero(&self) -> bool { self.0.is_zero() }
}

impl FromStr for DiscountRate {
    type Err = DiscountError;

    /// Accepts deal discount text such as `"15%"`, `"12.5 %"` or `"20"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.chars().filter(|c| *c != '%').collect();
        let cleaned = cleaned.trim();
        if cleaned.is_empty() { return Err(DiscountError::Empty); }
        let percent = Decimal::from_str(cleaned)
            .or_else(|_| Decimal::from_scientific(cleaned))
            .map_err(|_| DiscountError::NotANumber(s.to_string()))?;
        Ok(Self::from_percent(percent))
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}%", self.0.normalize()) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum DiscountError { Empty, NotANumber(String) }
impl std::error::Error for DiscountError {}
impl fmt::Display for DiscountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "discount is empty"),
            Self::NotANumber(s) => write!(f, "discount '{}' is not a percentage", s),
        }
    }
}

/// Quantity value object
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    pub fn new(value: u32) -> Self { Self(value) }
    pub fn value(&self) -> u32 { self.0 }
    pub fn add(&self, other: u32) -> Self { Self(self.0.saturating_add(other)) }
}

impl Default for Quantity { fn default() -> Self { Self(0) } }
