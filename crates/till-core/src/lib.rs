//! # till-core: Order Computation for Till POS
//!
//! Everything the register needs to price, validate and close out an order,
//! as pure functions with no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Till POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Front-end (any UI)                           │   │
//! │  │    Product Grid ──► Cart ──► Payment ──► Receipt ──► Reports    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON lines over stdio                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    till-register commands                       │   │
//! │  │    add_to_cart, set_discount, process_payment, sales_report    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌────────┐ ┌────────┐ ┌────────┐ ┌──────────┐ ┌─────────┐    │   │
//! │  │   │ money  │ │ types  │ │  cart  │ │  totals  │ │checkout │    │   │
//! │  │   └────────┘ └────────┘ └────────┘ └──────────┘ └─────────┘    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOCKS • NO CLOCK READS EXCEPT RECEIPT IDS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    till-store (in-memory state)                 │   │
//! │  │          catalog, customers, history, atomic checkout           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Fixed-point Money (micro-units, exact tax and discount)
//! - [`types`] - Product, Customer, CartLine, Transaction, Tender
//! - [`cart`] - Cart engine with stock-clamped quantities
//! - [`totals`] - Subtotal, tax, discount and final total
//! - [`checkout`] - Pure checkout planning
//! - [`receipt`] - Receipt ids and barcodes
//! - [`validation`] - Form and input rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::cart::Cart;
//! use till_core::money::Money;
//! use till_core::types::{DiscountRate, Product};
//!
//! let coffee = Product {
//!     id: "1".to_string(),
//!     name: "Premium Coffee Beans".to_string(),
//!     price_cents: 2499,
//!     category: "Beverages".to_string(),
//!     stock: 45,
//!     tax_rate_bps: 800,
//!     description: String::new(),
//!     image_url: String::new(),
//!     barcode: String::new(),
//! };
//!
//! let mut cart = Cart::new();
//! cart.add_item(&coffee);
//! cart.add_item(&coffee);
//! cart.set_discount(DiscountRate::from_percent(10)?);
//!
//! let totals = cart.discounted_totals();
//! assert_eq!(totals.total, Money::from_micros(53_978_400)); // 53.9784
//! assert_eq!(totals.final_total, Money::from_micros(48_980_400)); // 48.9804
//! # Ok::<(), till_core::ValidationError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod receipt;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartOutcome, UnchangedReason};
pub use checkout::{plan_checkout, CheckoutPlan, CheckoutRequest, LoyaltyAccrual};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use totals::{DiscountedTotals, Totals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level below which the inventory screen flags a product.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Category name that matches every product in the grid filter.
pub const ALL_CATEGORIES: &str = "All";
