//! # Domain Types
//!
//! Core domain types used throughout Till POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartLine     │   │  Transaction    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  product (copy) │◄──│  items (copy)   │       │
//! │  │  price_cents    │   │  quantity       │   │  subtotal/tax   │       │
//! │  │  stock          │   │  subtotal       │   │  discount/total │       │
//! │  │  tax_rate_bps   │   └─────────────────┘   │  payment_method │       │
//! │  └─────────────────┘                         │  cashier        │       │
//! │                                              └────────┬────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐            │                │
//! │  │    Customer     │   │ PaymentMethod   │◄───────────┘                │
//! │  │  loyalty_points │   │  Card           │                             │
//! │  │  total_spent    │   │  Cash           │                             │
//! │  └─────────────────┘   │  Digital        │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `CartLine` carries a full copy of its product, and a `Transaction`
//! carries full copies of its lines. Editing the catalog or the cart later
//! never rewrites history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 800 bps = 8% (a product `tax` of `0.08`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// A whole-order percentage discount in basis points.
///
/// Always within 0..=10000 (0% to 100%). Out-of-range values are rejected at
/// construction, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Upper bound in basis points (100%).
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a discount from basis points.
    pub fn from_bps(bps: u32) -> Result<Self, ValidationError> {
        if bps > Self::MAX_BPS {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: 100,
            });
        }
        Ok(DiscountRate(bps))
    }

    /// Creates a discount from a whole percentage.
    pub fn from_percent(pct: u32) -> Result<Self, ValidationError> {
        Self::from_bps(pct.saturating_mul(100))
    }

    /// Creates a discount from a fractional percentage such as `12.5`.
    ///
    /// The value is rounded to the nearest basis point. NaN, infinities and
    /// anything outside 0..=100 are rejected.
    pub fn from_percentage(pct: f64) -> Result<Self, ValidationError> {
        crate::validation::validate_discount_percentage(pct)?;
        Self::from_bps((pct * 100.0).round() as u32)
    }

    /// No discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Checks if no discount applies.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog entry available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique, stable identifier.
    pub id: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Category tag used by the product grid filter.
    pub category: String,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Tax rate in basis points (800 = 8%).
    pub tax_rate_bps: u32,

    pub description: String,

    /// Image reference for the product tile.
    pub image_url: String,

    /// Barcode (EAN-13 style digits).
    pub barcode: String,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Checks if at least one unit is on hand.
    #[inline]
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Classifies stock the way the inventory screen badges it.
    ///
    /// ```text
    /// stock == 0            → OutOfStock
    /// 0 < stock < threshold → LowStock
    /// otherwise             → InStock
    /// ```
    pub fn stock_status(&self, low_stock_threshold: i64) -> StockStatus {
        if self.stock <= 0 {
            StockStatus::OutOfStock
        } else if self.stock < low_stock_threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Checks if stock is below the threshold (out-of-stock included).
    #[inline]
    pub fn is_low_stock(&self, low_stock_threshold: i64) -> bool {
        self.stock < low_stock_threshold
    }
}

/// Inventory badge for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

/// Product data submitted from the inventory form, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub category: String,
    pub stock: i64,
    pub tax_rate_bps: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub barcode: String,
}

impl NewProduct {
    /// Attaches an identifier, producing a catalog entry.
    pub fn into_product(self, id: String) -> Product {
        Product {
            id,
            name: self.name,
            price_cents: self.price_cents,
            category: self.category,
            stock: self.stock,
            tax_rate_bps: self.tax_rate_bps,
            description: self.description,
            image_url: self.image_url,
            barcode: self.barcode,
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A loyalty-program customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Accrued reward balance: floor of every final total paid.
    pub loyalty_points: i64,
    /// Lifetime spend (final totals, after discount).
    pub total_spent: Money,
}

/// Customer data submitted from the customer form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl NewCustomer {
    /// Attaches an identifier with a zero balance.
    pub fn into_customer(self, id: String) -> Customer {
        Customer {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            loyalty_points: 0,
            total_spent: Money::zero(),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Credit or debit card.
    Card,
    /// Physical cash. The only method that records an amount tendered.
    Cash,
    /// Digital wallet.
    Digital,
}

impl PaymentMethod {
    /// Checks if this is a cash tender.
    #[inline]
    pub fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Digital => write!(f, "digital"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "card" | "credit" | "debit" => Ok(PaymentMethod::Card),
            "cash" => Ok(PaymentMethod::Cash),
            "digital" | "wallet" => Ok(PaymentMethod::Digital),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: vec!["card".to_string(), "cash".to_string(), "digital".to_string()],
            }),
        }
    }
}

/// The payment method and amount offered at checkout.
///
/// `amount` only matters for cash. A cash tender without an amount is taken
/// as the exact final total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Tender {
    pub method: PaymentMethod,
    pub amount: Option<Money>,
}

impl Tender {
    /// Card tender.
    pub fn card() -> Self {
        Tender {
            method: PaymentMethod::Card,
            amount: None,
        }
    }

    /// Digital wallet tender.
    pub fn digital() -> Self {
        Tender {
            method: PaymentMethod::Digital,
            amount: None,
        }
    }

    /// Cash tender with the amount handed over.
    pub fn cash(amount: Money) -> Self {
        Tender {
            method: PaymentMethod::Cash,
            amount: Some(amount),
        }
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One product bound to a quantity in the active cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    /// Product as it was when last touched by a cart operation.
    pub product: Product,
    /// Always ≥ 1 and ≤ product stock at the time of mutation.
    pub quantity: i64,
    /// quantity × unit price.
    pub subtotal: Money,
}

impl CartLine {
    /// Creates a line, deriving the subtotal.
    pub fn new(product: Product, quantity: i64) -> Self {
        let subtotal = product.price().multiply_quantity(quantity);
        CartLine {
            product,
            quantity,
            subtotal,
        }
    }

    /// The product identifier this line is keyed by.
    #[inline]
    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    /// Tax for this line at its own product's rate.
    pub fn tax(&self) -> Money {
        self.subtotal.calculate_tax(self.product.tax_rate())
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A completed sale. Created once per checkout and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    /// `RCP-<epochMillis>-<SUFFIX>`
    pub id: String,
    pub customer_id: Option<String>,
    /// Customer name at time of sale (frozen).
    pub customer_name: Option<String>,
    /// Deep copy of the cart lines at time of sale.
    pub items: Vec<CartLine>,
    pub subtotal: Money,
    /// Tax on the pre-discount subtotal.
    pub tax: Money,
    /// Discount amount taken off the subtotal.
    pub discount: Money,
    /// Final payable total.
    pub total: Money,
    pub payment_method: PaymentMethod,
    /// Amount handed over. Present for cash only.
    pub cash_received: Option<Money>,
    /// Operator who rang up the sale.
    pub cashier: String,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Change owed for a cash sale (presentation only, never negative).
    pub fn change_due(&self) -> Option<Money> {
        self.cash_received
            .map(|cash| (cash - self.total).max(Money::zero()))
    }

    /// Total units sold across all lines.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
