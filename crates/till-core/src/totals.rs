//! # Totals & Discount Resolver
//!
//! Pure arithmetic over cart lines.
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  lines ──► subtotal = Σ line.subtotal                                  │
//! │        └─► tax      = Σ line.subtotal × line.product.tax_rate          │
//! │                       (each line at its own rate, never pooled)        │
//! │                                                                         │
//! │  total       = subtotal + tax                                          │
//! │  discount    = subtotal × discount%         ◄── subtotal only          │
//! │  final_total = total − discount             ◄── tax is NOT discounted  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tax is computed on the pre-discount subtotal and the discount never
//! reduces it. Receipts issued by the register depend on this; keep it.
//!
//! ## Example
//! ```rust
//! use till_core::money::Money;
//! use till_core::totals::{apply_discount, Totals};
//! use till_core::types::DiscountRate;
//!
//! let totals = Totals {
//!     subtotal: Money::from_cents(4998),
//!     tax: Money::from_micros(3_998_400),
//!     total: Money::from_micros(53_978_400),
//! };
//! let resolved = apply_discount(totals, DiscountRate::from_percent(10)?);
//! assert_eq!(resolved.discount, Money::from_micros(4_998_000));
//! assert_eq!(resolved.final_total, Money::from_micros(48_980_400));
//! # Ok::<(), till_core::ValidationError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Add;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{CartLine, DiscountRate};

/// Subtotal, tax and total for a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

/// Totals after a whole-order discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountedTotals {
    pub subtotal: Money,
    pub tax: Money,
    /// Pre-discount total (subtotal + tax).
    pub total: Money,
    pub discount: Money,
    pub final_total: Money,
}

/// Computes subtotal, tax and total. All zero for no lines.
pub fn compute_totals(lines: &[CartLine]) -> Totals {
    let subtotal: Money = lines.iter().map(|line| line.subtotal).sum();
    let tax: Money = lines.iter().map(CartLine::tax).sum();

    Totals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

/// Applies a percentage discount to the subtotal.
pub fn apply_discount(totals: Totals, rate: DiscountRate) -> DiscountedTotals {
    let discount = totals.subtotal.discount_amount(rate);

    DiscountedTotals {
        subtotal: totals.subtotal,
        tax: totals.tax,
        total: totals.total,
        discount,
        final_total: totals.total - discount,
    }
}

impl Add for Totals {
    type Output = Totals;

    fn add(self, other: Totals) -> Totals {
        Totals {
            subtotal: self.subtotal + other.subtotal,
            tax: self.tax + other.tax,
            total: self.total + other.total,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
