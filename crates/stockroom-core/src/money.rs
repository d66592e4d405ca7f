//! # Money Module
//!
//! Provides the `Money` type for handling monetary values exactly.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floats:                                                    │
//! │    125.00 × 12% + 0.30 = 15.299999999999999  ❌                          │
//! │                                                                         │
//! │  Integer cents don't fit either: a $50 box split into 12 packs is      │
//! │  $4.1666… per pack, and the engine must NOT round before chaining that │
//! │  into profit math.                                                      │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal (28 significant digits)                 │
//! │    125.00 × 0.12 + 0.30 = 15.30 exactly                                │
//! │    Rounding happens once, at display time (`round_cents`) or where     │
//! │    pricing rules demand whole dollars (`ceil_whole`).                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use stockroom_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let total = price + Money::from_cents(500);
//! assert_eq!(total, Money::from_cents(1599));
//!
//! let per_pack = Money::from_cents(5000).checked_div(Decimal::from(12)).unwrap();
//! assert_eq!(per_pack.round_cents(), Money::from_cents(417));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A currency amount in major units (dollars), held as an exact decimal.
///
/// ## Design Decisions
/// - **Signed**: net profit is a `Money` and losses are negative
/// - **Unrounded**: arithmetic keeps full precision; see [`Money::round_cents`]
/// - **Serialized as a string** (`"15.30"`) so JavaScript never re-floats it
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Item.cost ──┬──► suggest_pricing ──► retail / pack / group prices     │
/// │              │                                                          │
/// │              └──► cost_per_pack ──► PackSale breakdown                  │
/// │                                                                         │
/// │  Sale.sold_price ──► platform fee ──► break-even ──► net profit        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Zero money value.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "$10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Creates a Money value from whole currency units.
    #[inline]
    pub fn from_whole(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Converts a number typed into a form field.
    ///
    /// NaN and infinities are rejected with `NotFinite` naming `field`.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// assert_eq!(Money::try_from_f64("cost", 12.5).unwrap(), Money::from_cents(1250));
    /// assert!(Money::try_from_f64("cost", f64::NAN).is_err());
    /// ```
    pub fn try_from_f64(field: &str, value: f64) -> Result<Self, ValidationError> {
        finite_decimal(field, value).map(Money)
    }

    /// Returns the exact underlying amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is strictly greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is strictly less than zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Rounds UP to the next whole currency unit.
    ///
    /// Already-whole amounts are returned unchanged.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(9900).ceil_whole(), Money::from_whole(99));
    /// assert_eq!(Money::from_cents(9901).ceil_whole(), Money::from_whole(100));
    /// ```
    #[inline]
    pub fn ceil_whole(&self) -> Self {
        Money(self.0.ceil())
    }

    /// Rounds to cents, half away from zero. For display and storage only;
    /// never feed the result back into further calculations.
    #[inline]
    pub fn round_cents(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Divides by `divisor`, returning `None` on a zero divisor or overflow.
    #[inline]
    pub fn checked_div(&self, divisor: Decimal) -> Option<Self> {
        self.0.checked_div(divisor).map(Money)
    }

    /// Adds `other`, returning `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtracts `other`, returning `None` on overflow.
    #[inline]
    pub fn checked_sub(&self, other: Money) -> Option<Self> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Scales by `factor`, returning `None` on overflow.
    #[inline]
    pub fn checked_mul(&self, factor: Decimal) -> Option<Self> {
        self.0.checked_mul(factor).map(Money)
    }

    /// Absolute difference between two amounts, saturating at the largest
    /// representable value.
    #[inline]
    pub fn abs_diff(&self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).abs())
    }
}

/// The error for a result too large to represent, naming `field`.
pub(crate) fn out_of_range(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: Decimal::MIN.to_string(),
        max: Decimal::MAX.to_string(),
    }
}

/// Converts a finite `f64` into a `Decimal`, naming `field` on failure.
pub(crate) fn finite_decimal(field: &str, value: f64) -> Result<Decimal, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    Decimal::try_from(value).map_err(|_| out_of_range(field))
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money rounded to cents, e.g. `$10.99` or `-$5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_cents().0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(f, "{}${:.2}", sign, rounded.abs())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Scaling by a factor (markups, fee fractions).
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, factor: Decimal) -> Self {
        Money(self.0 * factor)
    }
}

/// Multiplication by a count (quantities, group sizes).
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0 * Decimal::from(qty))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
