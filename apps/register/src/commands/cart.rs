//! # Cart Commands
//!
//! Commands for cart manipulation.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Payment  │────►│ Recorded │       │
//! │  │  Cart    │     │          │     │ Pending  │     │   Sale   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │       ▲                │                 │                │             │
//! │       │           add_to_cart      process_payment        │             │
//! │       │           update_item      (sale.rs)              │             │
//! │       │           set_discount                            │             │
//! │       │           select_customer                         │             │
//! │       │                │                                  │             │
//! │       └──── clear_cart ┘◄─────── cleared on success ──────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation answers with the whole cart plus a `change` telling the
//! front-end whether anything actually happened (a tap on an out-of-stock
//! tile is `unchanged`, not an error).

use serde::Serialize;
use tracing::debug;

use till_core::{Cart, CartLine, CartOutcome, Customer, DiscountedTotals};

use crate::error::ApiError;
use crate::state::{SessionState, StoreState};

/// Cart response including lines, customer and totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub customer: Option<Customer>,
    pub discount_percentage: f64,
    pub totals: DiscountedTotals,
    pub line_count: usize,
    pub total_quantity: i64,

    /// What the command did. Absent for plain reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<CartOutcome>,
}

impl CartResponse {
    /// Builds a response from a cart snapshot, resolving the selected
    /// customer against the live customer list.
    async fn build(store: &StoreState, cart: Cart, change: Option<CartOutcome>) -> Self {
        let customer = match cart.customer_id() {
            Some(id) => store.inner().customers().get_by_id(id).await,
            None => None,
        };

        CartResponse {
            totals: cart.discounted_totals(),
            discount_percentage: cart.discount().percentage(),
            line_count: cart.line_count(),
            total_quantity: cart.total_quantity(),
            lines: cart.lines().to_vec(),
            customer,
            change,
        }
    }
}

/// Gets the current cart contents.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart Panel (always visible on the POS screen)                         │
/// │                                                                         │
/// │  ┌────────────────────────────────────────────────────────────────┐    │
/// │  │  CART                                   Sarah Johnson  3 items │    │
/// │  ├────────────────────────────────────────────────────────────────┤    │
/// │  │  Premium Coffee Beans     x2                     $49.98        │    │
/// │  │  Artisan Chocolate Bar    x1                      $8.99        │    │
/// │  ├────────────────────────────────────────────────────────────────┤    │
/// │  │  Subtotal                                        $58.97        │    │
/// │  │  Tax                                              $4.72        │    │
/// │  │  Discount (10%)                                  -$5.90        │    │
/// │  │  ──────────────────────────────────────────────────            │    │
/// │  │  TOTAL                                           $57.79        │    │
/// │  └────────────────────────────────────────────────────────────────┘    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn get_cart(store: &StoreState, session: &SessionState) -> CartResponse {
    debug!("get_cart command");
    CartResponse::build(store, session.snapshot(), None).await
}

/// Adds one unit of a product to the cart.
///
/// ## Behavior
/// - Not in cart: new line with quantity 1
/// - Already in cart: quantity + 1, unless that would exceed stock
/// - Out of stock: nothing happens (`change: unchanged`)
///
/// ## Returns
/// * `Err(NOT_FOUND)` - No product with that id
pub async fn add_to_cart(
    store: &StoreState,
    session: &SessionState,
    product_id: &str,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = %product_id, "add_to_cart command");

    let product = store
        .inner()
        .products()
        .get_by_id(product_id)
        .await
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    let (outcome, cart) = session.with_cart_mut(|c| (c.add_item(&product), c.clone()));

    Ok(CartResponse::build(store, cart, Some(outcome)).await)
}

/// Sets the quantity of a line in the cart.
///
/// ## Behavior
/// - Quantity ≤ 0: removes the line
/// - Product sold out since it was added: removes the line
/// - Quantity above stock: capped at stock (`clamped: true`)
///
/// The line is re-snapshotted from the live catalog first so the cap uses
/// current stock rather than stock at the time the product was added.
pub async fn update_cart_item(
    store: &StoreState,
    session: &SessionState,
    product_id: &str,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = %product_id, quantity = %quantity, "update_cart_item command");

    let live = store.inner().products().get_by_id(product_id).await;

    let (outcome, cart) = session.with_cart_mut(|c| {
        if let Some(product) = &live {
            c.refresh_product(product);
        }
        c.set_quantity(product_id, quantity).map(|outcome| (outcome, c.clone()))
    })?;

    Ok(CartResponse::build(store, cart, Some(outcome)).await)
}

/// Removes a line from the cart. Removing something not in the cart is a
/// no-op.
pub async fn remove_from_cart(store: &StoreState, session: &SessionState, product_id: &str) -> CartResponse {
    debug!(product_id = %product_id, "remove_from_cart command");

    let (outcome, cart) = session.with_cart_mut(|c| (c.remove_item(product_id), c.clone()));

    CartResponse::build(store, cart, Some(outcome)).await
}

/// Clears lines, customer and discount.
///
/// ## When Used
/// - Cashier abandons the sale
/// - After a sale is recorded
pub async fn clear_cart(store: &StoreState, session: &SessionState) -> CartResponse {
    debug!("clear_cart command");

    let cart = session.with_cart_mut(|c| {
        c.clear();
        c.clone()
    });

    CartResponse::build(store, cart, None).await
}

/// Applies a whole-order discount percentage (0 to 100).
///
/// ## Returns
/// * `Err(VALIDATION_ERROR)` - Out of range; the previous discount stays
pub async fn set_discount(
    store: &StoreState,
    session: &SessionState,
    percentage: f64,
) -> Result<CartResponse, ApiError> {
    debug!(percentage, "set_discount command");

    let cart = session.with_cart_mut(|c| c.set_discount_percentage(percentage).map(|_| c.clone()))?;

    Ok(CartResponse::build(store, cart, None).await)
}

/// Attaches a customer for loyalty accrual, or detaches with `None`.
///
/// ## Returns
/// * `Err(NOT_FOUND)` - No customer with that id
pub async fn select_customer(
    store: &StoreState,
    session: &SessionState,
    customer_id: Option<String>,
) -> Result<CartResponse, ApiError> {
    debug!(customer_id = ?customer_id, "select_customer command");

    if let Some(id) = &customer_id {
        if store.inner().customers().get_by_id(id).await.is_none() {
            return Err(ApiError::not_found("Customer", id));
        }
    }

    let cart = session.with_cart_mut(|c| {
        c.select_customer(customer_id);
        c.clone()
    });

    Ok(CartResponse::build(store, cart, None).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use till_core::{Money, UnchangedReason};
    use till_store::Store;

    fn state() -> (StoreState, SessionState) {
        (StoreState::new(Store::with_demo_data()), SessionState::new())
    }

    #[tokio::test]
    async fn test_add_then_total() {
        let (store, session) = state();

        add_to_cart(&store, &session, "1").await.unwrap();
        let cart = add_to_cart(&store, &session, "1").await.unwrap();

        assert_eq!(cart.change, Some(CartOutcome::Updated { quantity: 2, clamped: false }));
        assert_eq!(cart.totals.subtotal, Money::from_cents(4998));
        assert_eq!(cart.totals.final_total, Money::from_micros(53_978_400));
        assert_eq!(cart.total_quantity, 2);
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_not_found() {
        let (store, session) = state();

        let err = add_to_cart(&store, &session, "nope").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_add_out_of_stock_is_unchanged() {
        let (store, session) = state();
        let mut tea = store.inner().products().get_by_id("2").await.unwrap();
        tea.stock = 0;
        store.inner().products().update(tea).await.unwrap();

        let cart = add_to_cart(&store, &session, "2").await.unwrap();

        assert_eq!(
            cart.change,
            Some(CartOutcome::Unchanged { reason: UnchangedReason::OutOfStock })
        );
        assert!(cart.lines.is_empty());
    }

    #[tokio::test]
    async fn test_update_clamps_to_live_stock() {
        let (store, session) = state();
        add_to_cart(&store, &session, "5").await.unwrap();

        let mut sandwich = store.inner().products().get_by_id("5").await.unwrap();
        sandwich.stock = 3;
        store.inner().products().update(sandwich).await.unwrap();

        let cart = update_cart_item(&store, &session, "5", 10).await.unwrap();

        assert_eq!(cart.change, Some(CartOutcome::Updated { quantity: 3, clamped: true }));
        assert_eq!(cart.lines[0].product.stock, 3);
    }

    #[tokio::test]
    async fn test_update_after_sell_out_drops_line() {
        let (store, session) = state();
        add_to_cart(&store, &session, "5").await.unwrap();

        let mut sandwich = store.inner().products().get_by_id("5").await.unwrap();
        sandwich.stock = 0;
        store.inner().products().update(sandwich).await.unwrap();

        let cart = update_cart_item(&store, &session, "5", 2).await.unwrap();

        assert_eq!(cart.change, Some(CartOutcome::Removed));
        assert!(cart.lines.is_empty());
        assert_eq!(cart.totals, DiscountedTotals::default());
    }

    #[tokio::test]
    async fn test_update_zero_removes_and_missing_line_errors() {
        let (store, session) = state();
        add_to_cart(&store, &session, "3").await.unwrap();

        let cart = update_cart_item(&store, &session, "3", 0).await.unwrap();
        assert_eq!(cart.change, Some(CartOutcome::Removed));

        let err = update_cart_item(&store, &session, "3", 2).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test]
    async fn test_discount_and_customer() {
        let (store, session) = state();
        add_to_cart(&store, &session, "1").await.unwrap();
        add_to_cart(&store, &session, "1").await.unwrap();

        let cart = set_discount(&store, &session, 10.0).await.unwrap();
        assert_eq!(cart.totals.discount, Money::from_micros(4_998_000));
        assert_eq!(cart.totals.final_total, Money::from_micros(48_980_400));

        let err = set_discount(&store, &session, 150.0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_cart(&store, &session).await.discount_percentage, 10.0);

        let cart = select_customer(&store, &session, Some("2".to_string())).await.unwrap();
        assert_eq!(cart.customer.map(|c| c.name), Some("Michael Chen".to_string()));

        let err = select_customer(&store, &session, Some("99".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_clear_resets_everything() {
        let (store, session) = state();
        add_to_cart(&store, &session, "1").await.unwrap();
        set_discount(&store, &session, 5.0).await.unwrap();
        select_customer(&store, &session, Some("1".to_string())).await.unwrap();

        let cart = clear_cart(&store, &session).await;

        assert!(cart.lines.is_empty());
        assert!(cart.customer.is_none());
        assert_eq!(cart.discount_percentage, 0.0);
        assert_eq!(cart.totals, DiscountedTotals::default());
    }

    #[tokio::test]
    async fn test_remove_missing_is_unchanged() {
        let (store, session) = state();

        let cart = remove_from_cart(&store, &session, "1").await;

        assert_eq!(
            cart.change,
            Some(CartOutcome::Unchanged { reason: UnchangedReason::NotInCart })
        );
    }
}
