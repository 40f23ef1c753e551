//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Fixed-Point Micro-Units?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  THE ROUND-TO-CENTS PROBLEM                                             │
//! │    $49.98 × 8% tax = $3.9984                                            │
//! │    Rounding every line to cents drifts away from the exact figure       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer micro-units (1/1,000,000 of a dollar)            │
//! │    4998 cents × 800 bps = 3,998,400 micros = $3.9984 exactly            │
//! │    Rounding happens only when a human looks at the number              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices come in as whole cents, tax and discount rates as basis points.
//! With those inputs every tax, discount and total the register computes is
//! exact in micro-units.
//!
//! ## Usage
//! ```rust
//! use till_core::money::Money;
//!
//! let price = Money::from_cents(2499); // $24.99
//! let line = price * 2;                // $49.98
//! assert_eq!(line.micros(), 49_980_000);
//! assert_eq!(line.to_string(), "$49.98");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::{DiscountRate, TaxRate};

/// Micro-units in one major currency unit.
pub const MICROS_PER_UNIT: i64 = 1_000_000;

/// Micro-units in one cent.
pub const MICROS_PER_CENT: i64 = 10_000;

/// Basis points in 100%.
const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in micro-units (millionths of the major currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for change and adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **No floats anywhere**: there is no `from_f64`
/// - **Saturating operators**: an absurd amount pins at `i64::MAX` instead of
///   panicking mid-command; the validation bounds keep real inputs far below it
///
/// ## Where Money is Used
/// ```text
/// Product.price_cents ──► CartLine.subtotal ──► Totals.subtotal
///                                                   │
///                    TaxRate (bps) ─────────────────┼──► Totals.tax
///                    DiscountRate (bps) ────────────┴──► DiscountedTotals
///                                                            │
///                                   Transaction.total ◄──────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from micro-units.
    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        Money(micros)
    }

    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.micros(), 10_990_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents.saturating_mul(MICROS_PER_CENT))
    }

    /// Returns the raw value in micro-units.
    #[inline]
    pub const fn micros(&self) -> i64 {
        self.0
    }

    /// Returns the whole major units, rounding toward negative infinity.
    ///
    /// This is `floor()` on the exact amount: $48.9804 → 48, -$0.50 → -1.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// assert_eq!(Money::from_micros(48_980_400).whole_units(), 48);
    /// ```
    #[inline]
    pub const fn whole_units(&self) -> i64 {
        self.0.div_euclid(MICROS_PER_UNIT)
    }

    /// Rounds to the nearest cent, halves away from zero.
    ///
    /// Presentation only. Nothing in the totals, discount or checkout
    /// arithmetic calls this.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// assert_eq!(Money::from_micros(53_978_400).round_to_cents(), 5398);
    /// assert_eq!(Money::from_micros(4_995_000).round_to_cents(), 500);
    /// assert_eq!(Money::from_micros(-4_995_000).round_to_cents(), -500);
    /// ```
    pub const fn round_to_cents(&self) -> i64 {
        let half = MICROS_PER_CENT / 2;
        if self.0 >= 0 {
            (self.0 + half) / MICROS_PER_CENT
        } else {
            (self.0 - half) / MICROS_PER_CENT
        }
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates tax on this amount.
    ///
    /// ## Implementation
    /// `micros × bps / 10_000`, computed in i128. When the amount is a whole
    /// number of cents (every line subtotal is) the division is exact, so no
    /// rounding takes place.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    /// use till_core::types::TaxRate;
    ///
    /// let line = Money::from_cents(4998);      // $49.98
    /// let tax = line.calculate_tax(TaxRate::from_bps(800)); // 8%
    /// assert_eq!(tax.micros(), 3_998_400);     // $3.9984
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        Money::from_micros(scale_bps(self.0, rate.bps()))
    }

    /// Returns the portion of this amount covered by a percentage discount.
    ///
    /// The discount amount, not the discounted remainder.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    /// use till_core::types::DiscountRate;
    ///
    /// let subtotal = Money::from_cents(4998);
    /// let off = subtotal.discount_amount(DiscountRate::from_percent(10)?);
    /// assert_eq!(off.micros(), 4_998_000); // $4.998
    /// # Ok::<(), till_core::ValidationError>(())
    /// ```
    pub fn discount_amount(&self, rate: DiscountRate) -> Money {
        Money::from_micros(scale_bps(self.0, rate.bps()))
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_cents(897));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

fn scale_bps(micros: i64, bps: u32) -> i64 {
    // i128 keeps large ledgers from overflowing before the division
    (micros as i128 * bps as i128 / BPS_SCALE) as i64
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount rounded to cents, e.g. `$53.98`.
///
/// ## Note
/// This is for logs and debugging. Locale-aware display belongs to the
/// front-end.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.round_to_cents();
        let sign = if cents < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, (cents / 100).abs(), (cents % 100).abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
