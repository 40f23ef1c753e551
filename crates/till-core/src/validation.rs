//! # Validation Module
//!
//! Input validation for catalog, customer, cart and discount inputs.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front-end forms                                              │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Register command (Rust)                                      │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store                                                        │
//! │  └── Identity lookups (NotFound)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::validation::{validate_discount_percentage, validate_product_name};
//!
//! assert!(validate_product_name("Fresh Croissant").is_ok());
//! assert!(validate_discount_percentage(150.0).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{NewCustomer, NewProduct};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Highest unit price accepted: $100,000.00.
pub const MAX_PRICE_CENTS: i64 = 10_000_000;

/// Highest stock level accepted for one product.
pub const MAX_STOCK: i64 = 100_000;

/// Most cash a customer can hand over for one sale: $1,000,000.00.
pub const MAX_CASH_CENTS: i64 = 100_000_000;

// =============================================================================
// String Validators
// =============================================================================

fn require_trimmed(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name (1 to 200 characters).
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Organic Green Tea").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    require_trimmed("name", name, 200)
}

/// Validates a category tag (1 to 50 characters).
pub fn validate_category(category: &str) -> ValidationResult<()> {
    require_trimmed("category", category, 50)
}

/// Validates a customer name (1 to 100 characters).
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    require_trimmed("name", name, 100)
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one `@` with something on both sides
pub fn validate_email(email: &str) -> ValidationResult<()> {
    require_trimmed("email", email, 254)?;

    let mut parts = email.trim().split('@');
    let valid = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
    );

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        });
    }

    Ok(())
}

/// Validates a barcode.
///
/// ## Rules
/// - May be empty (not every product has one)
/// - Otherwise digits only, at most 32 of them
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    if barcode.is_empty() {
        return Ok(());
    }

    if barcode.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: 32,
        });
    }

    if !barcode.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (matches everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents. Zero is allowed (free items).
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(2499).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    require_in_range("price", cents, MAX_PRICE_CENTS)
}

/// Validates a stock level (0 to `MAX_STOCK`).
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    require_in_range("stock", stock, MAX_STOCK)
}

/// Validates cash handed over at the payment screen, in cents.
///
/// ## Example
/// ```rust
/// use till_core::validation::{validate_cash_cents, MAX_CASH_CENTS};
///
/// assert!(validate_cash_cents(6000).is_ok());
/// assert!(validate_cash_cents(-1).is_err());
/// assert!(validate_cash_cents(MAX_CASH_CENTS + 1).is_err());
/// ```
pub fn validate_cash_cents(cents: i64) -> ValidationResult<()> {
    require_in_range("cash_received", cents, MAX_CASH_CENTS)
}

// Price × stock × a catalog's worth of lines stays far inside i64 micro-units.
fn require_in_range(field: &str, value: i64, max: i64) -> ValidationResult<()> {
    if !(0..=max).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates a discount percentage typed into the cart.
///
/// ## Rules
/// - Must be a finite number
/// - Must be within 0..=100
///
/// Out-of-range values are rejected, never clamped.
pub fn validate_discount_percentage(pct: f64) -> ValidationResult<()> {
    if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates everything the inventory form submits.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_category(&product.category)?;
    validate_price_cents(product.price_cents)?;
    validate_stock(product.stock)?;
    validate_tax_rate_bps(product.tax_rate_bps)?;
    validate_barcode(&product.barcode)?;
    Ok(())
}

/// Validates everything the customer form submits.
///
/// Phone is free-form (`(555) 123-4567`), so only required.
pub fn validate_new_customer(customer: &NewCustomer) -> ValidationResult<()> {
    validate_customer_name(&customer.name)?;
    validate_email(&customer.email)?;
    require_trimmed("phone", &customer.phone, 32)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
