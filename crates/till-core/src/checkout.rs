//! # Checkout Planner
//!
//! Turns a cart into a transaction plus the side effects needed to commit it.
//!
//! ## Plan, Then Apply
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Pipeline                                │
//! │                                                                         │
//! │  plan_checkout (this module, pure)                                     │
//! │  ├── 1. Cart not empty                        → EmptyCart              │
//! │  ├── 2. Every line resolves in live catalog   → ProductNotFound        │
//! │  ├── 3. Live stock ≥ line quantity            → InsufficientStock      │
//! │  ├── 4. Selected customer resolves            → CustomerNotFound       │
//! │  ├── 5. Cash covers final total               → InsufficientTender     │
//! │  └── 6. Build Transaction + stock decrements + loyalty accrual         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Store::checkout (till-store, under one lock)                          │
//! │  └── apply every effect, or none when planning failed                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Planning never mutates anything, so a failed plan leaves catalog, customers
//! and history exactly as they were.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::receipt::generate_receipt_id;
use crate::types::{Customer, Product, Tender, Transaction};

/// Everything about a checkout that does not come from the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub tender: Tender,
    /// Operator name stamped on the transaction.
    pub cashier: String,
    pub timestamp: DateTime<Utc>,
    pub receipt_id: String,
}

impl CheckoutRequest {
    /// Creates a request stamped with a fresh receipt id.
    pub fn new(tender: Tender, cashier: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        CheckoutRequest {
            tender,
            cashier: cashier.into(),
            timestamp,
            receipt_id: generate_receipt_id(timestamp),
        }
    }
}

/// Reward and spend credited to the selected customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyAccrual {
    pub customer_id: String,
    /// floor(final total) in whole currency units.
    pub points: i64,
    /// Final total (after discount).
    pub spend: Money,
}

impl LoyaltyAccrual {
    /// Credits this accrual to a customer record.
    pub fn apply_to(&self, customer: &mut Customer) {
        customer.loyalty_points += self.points;
        customer.total_spent += self.spend;
    }
}

/// The outcome of a successful plan. Nothing has been applied yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPlan {
    pub transaction: Transaction,
    /// (product id, units sold) for every line.
    pub stock_decrements: Vec<(String, i64)>,
    pub loyalty: Option<LoyaltyAccrual>,
}

/// Validates a cart against live data and builds the checkout effects.
///
/// `catalog` is the live product list; `customer` is the live record for the
/// cart's selected customer (if any). Line snapshots are copied into the
/// transaction as they are, while stock is checked against `catalog`.
///
/// ## Errors
/// See the pipeline above. The first failing check wins.
pub fn plan_checkout(
    cart: &Cart,
    catalog: &[Product],
    customer: Option<&Customer>,
    request: CheckoutRequest,
) -> CoreResult<CheckoutPlan> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    for line in cart.lines() {
        let live = catalog
            .iter()
            .find(|p| p.id == line.product_id())
            .ok_or_else(|| CoreError::ProductNotFound(line.product_id().to_string()))?;

        if live.stock < line.quantity {
            return Err(CoreError::InsufficientStock {
                product_id: live.id.clone(),
                name: live.name.clone(),
                available: live.stock,
                requested: line.quantity,
            });
        }
    }

    let customer = match cart.customer_id() {
        Some(id) => match customer {
            Some(c) if c.id == id => Some(c),
            _ => return Err(CoreError::CustomerNotFound(id.to_string())),
        },
        None => None,
    };

    let totals = cart.discounted_totals();

    let cash_received = if request.tender.method.is_cash() {
        let tendered = request.tender.amount.unwrap_or(totals.final_total);
        if tendered < totals.final_total {
            return Err(CoreError::InsufficientTender {
                required: totals.final_total,
                tendered,
            });
        }
        Some(tendered)
    } else {
        None
    };

    let transaction = Transaction {
        id: request.receipt_id,
        customer_id: customer.map(|c| c.id.clone()),
        customer_name: customer.map(|c| c.name.clone()),
        items: cart.lines().to_vec(),
        subtotal: totals.subtotal,
        tax: totals.tax,
        discount: totals.discount,
        total: totals.final_total,
        payment_method: request.tender.method,
        cash_received,
        cashier: request.cashier,
        timestamp: request.timestamp,
    };

    let stock_decrements = cart
        .lines()
        .iter()
        .map(|line| (line.product_id().to_string(), line.quantity))
        .collect();

    let loyalty = customer.map(|c| LoyaltyAccrual {
        customer_id: c.id.clone(),
        points: totals.final_total.whole_units(),
        spend: totals.final_total,
    });

    Ok(CheckoutPlan {
        transaction,
        stock_decrements,
        loyalty,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DiscountRate, PaymentMethod};
    use chrono::TimeZone;

    fn coffee(stock: i64) -> Product {
        Product {
            id: "1".to_string(),
            name: "Premium Coffee Beans".to_string(),
            price_cents: 2499,
            category: "Beverages".to_string(),
            stock,
            tax_rate_bps: 800,
            description: String::new(),
            image_url: String::new(),
            barcode: "1234567890123".to_string(),
        }
    }

    fn sarah() -> Customer {
        Customer {
            id: "1".to_string(),
            name: "Sarah Johnson".to_string(),
            email: "sarah@email.com".to_string(),
            phone: "(555) 123-4567".to_string(),
            loyalty_points: 245,
            total_spent: Money::from_cents(125_075),
        }
    }

    fn request(tender: Tender) -> CheckoutRequest {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 16, 0, 0).unwrap();
        CheckoutRequest::new(tender, "John Smith", now)
    }

    /// Two coffees, 10% off: final total 48.9804.
    fn discounted_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(&coffee(45));
        cart.add_item(&coffee(45));
        cart.set_discount(DiscountRate::from_percent(10).unwrap());
        cart
    }

    #[test]
    fn test_empty_cart_rejected() {
        let err = plan_checkout(&Cart::new(), &[coffee(45)], None, request(Tender::card()))
            .unwrap_err();
        assert!(matches!(err, CoreError::EmptyCart));
    }

    #[test]
    fn test_card_checkout_builds_transaction() {
        let cart = discounted_cart();
        let plan = plan_checkout(&cart, &[coffee(45)], None, request(Tender::card())).unwrap();
        let txn = &plan.transaction;

        assert_eq!(txn.subtotal, Money::from_cents(4998));
        assert_eq!(txn.tax, Money::from_micros(3_998_400));
        assert_eq!(txn.discount, Money::from_micros(4_998_000));
        assert_eq!(txn.total, Money::from_micros(48_980_400));
        assert_eq!(txn.payment_method, PaymentMethod::Card);
        assert_eq!(txn.cash_received, None);
        assert_eq!(txn.cashier, "John Smith");
        assert_eq!(txn.items, cart.lines().to_vec());
        assert_eq!(plan.stock_decrements, vec![("1".to_string(), 2)]);
        assert!(plan.loyalty.is_none());
    }

    #[test]
    fn test_cash_checkout_records_change() {
        let plan = plan_checkout(
            &discounted_cart(),
            &[coffee(45)],
            None,
            request(Tender::cash(Money::from_cents(6000))),
        )
        .unwrap();

        assert_eq!(plan.transaction.cash_received, Some(Money::from_cents(6000)));
        assert_eq!(plan.transaction.change_due(), Some(Money::from_micros(11_019_600)));
    }

    #[test]
    fn test_cash_without_amount_is_exact() {
        let tender = Tender {
            method: PaymentMethod::Cash,
            amount: None,
        };
        let plan = plan_checkout(&discounted_cart(), &[coffee(45)], None, request(tender)).unwrap();

        assert_eq!(plan.transaction.change_due(), Some(Money::zero()));
    }

    #[test]
    fn test_short_cash_rejected() {
        let err = plan_checkout(
            &discounted_cart(),
            &[coffee(45)],
            None,
            request(Tender::cash(Money::from_cents(4000))),
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::InsufficientTender { .. }));
    }

    #[test]
    fn test_stock_rechecked_against_live_catalog() {
        let err = plan_checkout(&discounted_cart(), &[coffee(1)], None, request(Tender::card()))
            .unwrap_err();

        match err {
            CoreError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 1);
                assert_eq!(requested, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_deleted_product_rejected() {
        let err =
            plan_checkout(&discounted_cart(), &[], None, request(Tender::card())).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(id) if id == "1"));
    }

    #[test]
    fn test_loyalty_accrues_floor_of_final_total() {
        let mut cart = discounted_cart();
        cart.select_customer(Some("1".to_string()));
        let mut customer = sarah();

        let plan =
            plan_checkout(&cart, &[coffee(45)], Some(&customer), request(Tender::card())).unwrap();
        let accrual = plan.loyalty.expect("customer selected");

        assert_eq!(accrual.points, 48);
        assert_eq!(plan.transaction.customer_name.as_deref(), Some("Sarah Johnson"));

        accrual.apply_to(&mut customer);
        assert_eq!(customer.loyalty_points, 293);
        assert_eq!(
            customer.total_spent,
            Money::from_cents(125_075) + Money::from_micros(48_980_400)
        );
    }

    #[test]
    fn test_unresolved_customer_rejected() {
        let mut cart = discounted_cart();
        cart.select_customer(Some("99".to_string()));

        let err = plan_checkout(&cart, &[coffee(45)], Some(&sarah()), request(Tender::card()))
            .unwrap_err();
        assert!(matches!(err, CoreError::CustomerNotFound(id) if id == "99"));
    }
}
