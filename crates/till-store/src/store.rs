//! # Store Handle
//!
//! The shared tables and the one operation that touches all of them at once:
//! checkout.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Store Tables                                   │
//! │                                                                         │
//! │  Register startup                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::with_demo_data() / Store::new() / Store::with_data(...)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │       Arc<Mutex<Tables>>                 │                           │
//! │  │  ┌──────────┐ ┌───────────┐ ┌────────┐  │                           │
//! │  │  │ products │ │ customers │ │ ledger │  │                           │
//! │  │  └──────────┘ └───────────┘ └────────┘  │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │            │             │                                      │
//! │  products()   customers()   transactions()   ← cheap handles           │
//! │                                                                         │
//! │  checkout() holds the lock across plan + apply, so no other command    │
//! │  can observe a half-applied sale.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use till_core::checkout::{plan_checkout, CheckoutPlan, CheckoutRequest};
use till_core::{Cart, Customer, Product, Transaction};

use crate::error::StoreResult;
use crate::repository::customer::CustomerRepository;
use crate::repository::product::ProductRepository;
use crate::repository::transaction::TransactionRepository;
use crate::seed;

// =============================================================================
// Tables
// =============================================================================

/// Every table the register mutates.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) products: Vec<Product>,
    pub(crate) customers: Vec<Customer>,
    /// Newest first.
    pub(crate) transactions: Vec<Transaction>,
}

impl Tables {
    /// Applies a validated plan. Must run under the same lock the plan was
    /// computed under.
    fn apply(&mut self, plan: CheckoutPlan) -> Transaction {
        for (product_id, quantity) in &plan.stock_decrements {
            if let Some(product) = self.products.iter_mut().find(|p| &p.id == product_id) {
                product.stock -= quantity;
                debug!(product_id = %product_id, remaining = product.stock, "Stock decremented");
            }
        }

        if let Some(accrual) = &plan.loyalty {
            if let Some(customer) = self
                .customers
                .iter_mut()
                .find(|c| c.id == accrual.customer_id)
            {
                accrual.apply_to(customer);
                debug!(
                    customer_id = %customer.id,
                    points = accrual.points,
                    balance = customer.loyalty_points,
                    "Loyalty accrued"
                );
            }
        }

        self.transactions.insert(0, plan.transaction.clone());
        plan.transaction
    }
}

// =============================================================================
// Store
// =============================================================================

/// Handle to the register's shared state. Clones share the same tables.
///
/// ## Usage
/// ```rust,ignore
/// let store = Store::with_demo_data();
///
/// let coffee = store.products().get_by_id("1").await;
/// let txn = store.checkout(&cart, request).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Store {
    tables: Arc<Mutex<Tables>>,
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Store::default()
    }

    /// Creates a store holding the given catalog and customers, with no
    /// transaction history.
    pub fn with_data(products: Vec<Product>, customers: Vec<Customer>) -> Self {
        Store::from_tables(Tables {
            products,
            customers,
            transactions: Vec::new(),
        })
    }

    /// Creates a store with the demo catalog, customers and two past sales.
    pub fn with_demo_data() -> Self {
        let tables = Tables {
            products: seed::demo_products(),
            customers: seed::demo_customers(),
            transactions: seed::demo_transactions(Utc::now()),
        };
        info!(
            products = tables.products.len(),
            customers = tables.customers.len(),
            "Seeded demo data"
        );
        Store::from_tables(tables)
    }

    fn from_tables(tables: Tables) -> Self {
        Store {
            tables: Arc::new(Mutex::new(tables)),
        }
    }

    /// Returns the product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.tables.clone())
    }

    /// Returns the customer repository.
    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.tables.clone())
    }

    /// Returns the transaction repository.
    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.tables.clone())
    }

    /// Completes a sale.
    ///
    /// ## What This Does
    /// 1. Locks every table
    /// 2. Plans the checkout against live stock and the live customer record
    /// 3. On success: decrements stock, credits loyalty, prepends the
    ///    transaction to the ledger
    ///
    /// The cart is not touched; clearing it is the caller's job once this
    /// returns Ok.
    ///
    /// ## Errors
    /// Any planning failure (`EmptyCart`, `InsufficientStock`,
    /// `InsufficientTender`, ...). Nothing is mutated in that case.
    pub async fn checkout(&self, cart: &Cart, request: CheckoutRequest) -> StoreResult<Transaction> {
        let mut tables = self.tables.lock().await;

        let customer = cart
            .customer_id()
            .and_then(|id| tables.customers.iter().find(|c| c.id == id));

        let plan = match plan_checkout(cart, &tables.products, customer, request) {
            Ok(plan) => plan,
            Err(err) => {
                warn!(error = %err, "Checkout rejected");
                return Err(err.into());
            }
        };

        let transaction = tables.apply(plan);

        info!(
            receipt = %transaction.id,
            total = %transaction.total,
            method = %transaction.payment_method,
            items = transaction.item_count(),
            "Checkout complete"
        );

        Ok(transaction)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use till_core::{CoreError, DiscountRate, Money, Tender};

    fn request(tender: Tender) -> CheckoutRequest {
        CheckoutRequest::new(tender, "John Smith", Utc::now())
    }

    fn store() -> Store {
        Store::with_data(seed::demo_products(), seed::demo_customers())
    }

    async fn cart_with_two_coffees(store: &Store) -> Cart {
        let coffee = store.products().get_by_id("1").await.unwrap();
        let mut cart = Cart::new();
        cart.add_item(&coffee);
        cart.add_item(&coffee);
        cart
    }

    #[tokio::test]
    async fn test_checkout_applies_all_effects() {
        let store = store();
        let mut cart = cart_with_two_coffees(&store).await;
        cart.select_customer(Some("1".to_string()));
        cart.set_discount(DiscountRate::from_percent(10).unwrap());

        let txn = store.checkout(&cart, request(Tender::card())).await.unwrap();

        assert_eq!(txn.total, Money::from_micros(48_980_400));
        assert_eq!(store.products().get_by_id("1").await.unwrap().stock, 43);

        let sarah = store.customers().get_by_id("1").await.unwrap();
        assert_eq!(sarah.loyalty_points, 245 + 48);
        assert_eq!(
            sarah.total_spent,
            Money::from_cents(125_075) + Money::from_micros(48_980_400)
        );

        let history = store.transactions().list().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, txn.id);
    }

    #[tokio::test]
    async fn test_recorded_items_ignore_later_cart_edits() {
        let store = store();
        let mut cart = cart_with_two_coffees(&store).await;

        let txn = store.checkout(&cart, request(Tender::card())).await.unwrap();
        let recorded = txn.items.clone();

        let tea = store.products().get_by_id("2").await.unwrap();
        cart.add_item(&tea);
        cart.set_quantity("1", 1).unwrap();
        cart.clear();

        let stored = store.transactions().get_by_id(&txn.id).await.unwrap();
        assert_eq!(stored.items, recorded);
        assert_eq!(stored.items.len(), 1);
        assert_eq!(stored.items[0].quantity, 2);
        assert_eq!(stored.items[0].subtotal, Money::from_cents(4998));
    }

    #[tokio::test]
    async fn test_rejected_checkout_changes_nothing() {
        let store = store();
        let cart = cart_with_two_coffees(&store).await;

        let mut coffee = store.products().get_by_id("1").await.unwrap();
        coffee.stock = 1;
        store.products().update(coffee).await.unwrap();

        let err = store
            .checkout(&cart, request(Tender::card()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::Core(CoreError::InsufficientStock { available: 1, requested: 2, .. })
        ));
        assert_eq!(store.products().get_by_id("1").await.unwrap().stock, 1);
        assert!(store.transactions().list().await.is_empty());
    }

    #[tokio::test]
    async fn test_short_cash_changes_nothing() {
        let store = store();
        let cart = cart_with_two_coffees(&store).await;

        let err = store
            .checkout(&cart, request(Tender::cash(Money::from_cents(1000))))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::Core(CoreError::InsufficientTender { .. })
        ));
        assert_eq!(store.products().get_by_id("1").await.unwrap().stock, 45);
    }

    #[tokio::test]
    async fn test_ledger_is_newest_first() {
        let store = store();
        let cart = cart_with_two_coffees(&store).await;

        let first = store.checkout(&cart, request(Tender::card())).await.unwrap();
        let second = store.checkout(&cart, request(Tender::digital())).await.unwrap();

        let ids: Vec<String> = store
            .transactions()
            .list()
            .await
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert_eq!(store.products().get_by_id("1").await.unwrap().stock, 41);
    }

    #[tokio::test]
    async fn test_concurrent_checkouts_never_oversell() {
        let store = Store::with_data(
            vec![Product {
                stock: 3,
                ..seed::demo_products().remove(0)
            }],
            Vec::new(),
        );
        let cart = cart_with_two_coffees(&store).await;

        let a = {
            let (store, cart) = (store.clone(), cart.clone());
            tokio::spawn(async move { store.checkout(&cart, request(Tender::card())).await })
        };
        let b = {
            let (store, cart) = (store.clone(), cart.clone());
            tokio::spawn(async move { store.checkout(&cart, request(Tender::card())).await })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let succeeded = results.iter().filter(|r| r.is_ok()).count();

        assert_eq!(succeeded, 1);
        assert_eq!(store.products().get_by_id("1").await.unwrap().stock, 1);
    }

    #[tokio::test]
    async fn test_demo_store_has_history() {
        let store = Store::with_demo_data();
        assert_eq!(store.transactions().list().await.len(), 2);
        assert_eq!(store.customers().list().await.len(), 3);
    }
}
