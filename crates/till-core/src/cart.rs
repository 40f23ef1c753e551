//! # Cart Engine
//!
//! The active order: lines keyed by product id, plus the session-scoped
//! customer selection and discount.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Click Product ───────► add_item()      ──► qty + 1, capped at stock   │
//! │                                                                         │
//! │  Change Quantity ─────► set_quantity()  ──► min(requested, stock)      │
//! │                                             ≤ 0 behaves as remove      │
//! │                                                                         │
//! │  Click Remove ────────► remove_item()   ──► line dropped if present    │
//! │                                                                         │
//! │  Cancel / Paid ───────► clear()         ──► lines, customer, discount  │
//! │                                                                         │
//! │  NOTE: No operation here touches Product.stock. Stock only moves at    │
//! │        checkout.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No-ops vs Errors
//! Adding an out-of-stock product or going past the stock ceiling leaves the
//! cart untouched. That is reported as `CartOutcome::Unchanged(reason)`, not
//! as an error, so the UI can tell "nothing happened" from "added".

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::totals::{apply_discount, compute_totals, DiscountedTotals, Totals};
use crate::types::{CartLine, DiscountRate, Product};

/// What a cart operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum CartOutcome {
    /// A new line was inserted with quantity 1.
    Added,
    /// An existing line now has `quantity` units. `clamped` is set when the
    /// request exceeded stock and was capped.
    Updated { quantity: i64, clamped: bool },
    /// The line was deleted.
    Removed,
    /// The cart is exactly as it was.
    Unchanged { reason: UnchangedReason },
}

/// Why a cart operation was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UnchangedReason {
    /// Product has no stock at all.
    OutOfStock,
    /// Line already holds every unit in stock.
    AtStockLimit,
    /// Nothing to remove.
    NotInCart,
}

impl CartOutcome {
    /// Checks if the cart state changed.
    #[inline]
    pub fn is_change(&self) -> bool {
        !matches!(self, CartOutcome::Unchanged { .. })
    }

    fn unchanged(reason: UnchangedReason) -> Self {
        CartOutcome::Unchanged { reason }
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - At most one line per product id, in insertion order
/// - Every line quantity is ≥ 1 and ≤ its product's stock at the time of the
///   mutation that set it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,
    customer_id: Option<String>,
    discount: DiscountRate,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - stock == 0: no-op (`OutOfStock`)
    /// - already in cart at the stock ceiling: no-op (`AtStockLimit`)
    /// - already in cart above the ceiling (stock dropped since): quantity
    ///   pulled down to stock (`clamped: true`)
    /// - already in cart below the ceiling: quantity + 1
    /// - not in cart: new line, quantity 1, subtotal = unit price
    ///
    /// The line's product snapshot is refreshed from `product` whenever the
    /// line changes.
    pub fn add_item(&mut self, product: &Product) -> CartOutcome {
        if !product.is_in_stock() {
            return CartOutcome::unchanged(UnchangedReason::OutOfStock);
        }

        match self.line_mut(&product.id) {
            Some(line) => {
                if line.quantity == product.stock {
                    return CartOutcome::unchanged(UnchangedReason::AtStockLimit);
                }
                let quantity = (line.quantity + 1).min(product.stock);
                let clamped = quantity <= line.quantity;
                *line = CartLine::new(product.clone(), quantity);
                CartOutcome::Updated { quantity, clamped }
            }
            None => {
                self.lines.push(CartLine::new(product.clone(), 1));
                CartOutcome::Added
            }
        }
    }

    /// Sets a line's quantity.
    ///
    /// ## Behavior
    /// - quantity ≤ 0: same as `remove_item`
    /// - line's product has no stock left: line removed (`Removed`)
    /// - otherwise: quantity = min(requested, stock), subtotal recomputed
    ///
    /// ## Errors
    /// `LineNotFound` when asked for a positive quantity on a product that
    /// has no line.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<CartOutcome> {
        if quantity <= 0 {
            return Ok(self.remove_item(product_id));
        }

        let line = self
            .line_mut(product_id)
            .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))?;

        let clamped_quantity = quantity.min(line.product.stock);
        if clamped_quantity <= 0 {
            return Ok(self.remove_item(product_id));
        }

        let product = line.product.clone();
        *line = CartLine::new(product, clamped_quantity);

        Ok(CartOutcome::Updated {
            quantity: clamped_quantity,
            clamped: clamped_quantity < quantity,
        })
    }

    /// Replaces a line's product snapshot with fresher catalog data.
    ///
    /// Lets callers clamp `set_quantity` against live stock. Quantity is left
    /// alone; the subtotal follows the new price. Returns false when the
    /// product has no line.
    pub fn refresh_product(&mut self, product: &Product) -> bool {
        match self.line_mut(&product.id) {
            Some(line) => {
                *line = CartLine::new(product.clone(), line.quantity);
                true
            }
            None => false,
        }
    }

    /// Removes a product's line if present.
    pub fn remove_item(&mut self, product_id: &str) -> CartOutcome {
        let initial_len = self.lines.len();
        self.lines.retain(|line| line.product_id() != product_id);

        if self.lines.len() == initial_len {
            CartOutcome::unchanged(UnchangedReason::NotInCart)
        } else {
            CartOutcome::Removed
        }
    }

    /// Empties the cart and resets customer and discount.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.customer_id = None;
        self.discount = DiscountRate::zero();
    }

    /// Attaches (or detaches) a customer for loyalty accrual.
    pub fn select_customer(&mut self, customer_id: Option<String>) {
        self.customer_id = customer_id;
    }

    /// Sets the whole-order discount.
    pub fn set_discount(&mut self, discount: DiscountRate) {
        self.discount = discount;
    }

    /// Sets the discount from a typed-in percentage.
    ///
    /// ## Errors
    /// Values outside 0..=100 (or NaN) are rejected and the previous discount
    /// is kept.
    pub fn set_discount_percentage(&mut self, pct: f64) -> CoreResult<DiscountRate> {
        let discount = DiscountRate::from_percentage(pct)?;
        self.discount = discount;
        Ok(discount)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Looks up the line for a product.
    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id() == product_id)
    }

    fn line_mut(&mut self, product_id: &str) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id() == product_id)
    }

    /// Selected customer, if any.
    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    /// Current discount.
    pub fn discount(&self) -> DiscountRate {
        self.discount
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Subtotal, tax and total before discount.
    pub fn totals(&self) -> Totals {
        compute_totals(&self.lines)
    }

    /// Totals after the session discount.
    pub fn discounted_totals(&self) -> DiscountedTotals {
        apply_discount(self.totals(), self.discount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
