//! # Sale Commands
//!
//! Taking payment for the active cart.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    process_payment                                      │
//! │                                                                         │
//! │  1. Parse tender ("card" / "cash" + amount / "digital")                │
//! │  2. Snapshot the cart ──── empty? ──────────────► CART_ERROR            │
//! │  3. Cash short of total? ───────────────────────► PAYMENT_ERROR         │
//! │  4. Authorization window ── cancelled? ─────────► PAYMENT_CANCELLED     │
//! │  5. Store::checkout (live stock re-checked under the table lock)       │
//! │        └── short on stock? ─────────────────────► INSUFFICIENT_STOCK    │
//! │  6. Clear the cart                                                     │
//! │  7. Return the receipt                                                 │
//! │                                                                         │
//! │  Nothing is recorded and the cart is untouched on any error.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use till_core::checkout::CheckoutRequest;
use till_core::validation::validate_cash_cents;
use till_core::{Cart, CoreError, Money, PaymentMethod, Tender, Transaction};

use crate::error::ApiError;
use crate::payment::{PaymentProcessor, PendingPayment};
use crate::state::{RegisterConfig, SessionState, StoreState};

/// Tender as entered in the payment modal.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    /// `"card"`, `"cash"` or `"digital"` (case-insensitive).
    pub method: String,

    /// Cash handed over, in cents. Omitted means exact change.
    #[serde(default)]
    pub cash_received_cents: Option<i64>,
}

impl PaymentRequest {
    /// Resolves the tender. The amount is ignored for card and digital.
    pub fn tender(&self) -> Result<Tender, ApiError> {
        let method: PaymentMethod = self.method.parse()?;

        match (method, self.cash_received_cents) {
            (PaymentMethod::Cash, Some(cents)) => {
                validate_cash_cents(cents)?;
                Ok(Tender::cash(Money::from_cents(cents)))
            }
            (PaymentMethod::Cash, None) => Ok(Tender {
                method,
                amount: None,
            }),
            (PaymentMethod::Card, _) => Ok(Tender::card()),
            (PaymentMethod::Digital, _) => Ok(Tender::digital()),
        }
    }
}

/// Receipt shown after a completed sale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub transaction: Transaction,
    pub store_name: String,
    pub store_address: Vec<String>,
    /// Cash sales only.
    pub change_due: Option<Money>,
    /// Points credited to the selected customer, if any.
    pub loyalty_points_earned: Option<i64>,
    pub formatted_total: String,
    pub formatted_change: Option<String>,
}

impl ReceiptResponse {
    fn new(transaction: Transaction, config: &RegisterConfig) -> Self {
        let change_due = transaction.change_due();
        ReceiptResponse {
            store_name: config.store.name.clone(),
            store_address: config.store.address.clone(),
            change_due,
            loyalty_points_earned: transaction
                .customer_id
                .as_ref()
                .map(|_| transaction.total.whole_units()),
            formatted_total: config.format_currency(transaction.total),
            formatted_change: change_due.map(|c| config.format_currency(c)),
            transaction,
        }
    }
}

/// Takes payment for the active cart and records the sale.
///
/// ## Arguments
/// * `pending` - Receiving half from `PaymentProcessor::begin()`; the
///   caller keeps the handle to cancel with
///
/// ## Returns
/// * `Ok(ReceiptResponse)` - Sale recorded, cart cleared
/// * `Err(CART_ERROR)` - Cart is empty
/// * `Err(PAYMENT_ERROR)` - Cash does not cover the total
/// * `Err(PAYMENT_CANCELLED)` - Cashier cancelled during authorization
/// * `Err(INSUFFICIENT_STOCK)` - Stock fell below a line's quantity
pub async fn process_payment(
    store: &StoreState,
    session: &SessionState,
    config: &RegisterConfig,
    processor: &PaymentProcessor,
    request: PaymentRequest,
    pending: PendingPayment,
) -> Result<ReceiptResponse, ApiError> {
    debug!(method = %request.method, cash = ?request.cash_received_cents, "process_payment command");

    let tender = request.tender()?;
    let cart = session.snapshot();

    if cart.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let due = cart.discounted_totals().final_total;
    if let Some(tendered) = tender.amount.filter(|_| tender.method.is_cash()) {
        if tendered < due {
            return Err(CoreError::InsufficientTender {
                required: due,
                tendered,
            }
            .into());
        }
    }

    processor.authorize(&tender, pending).await?;

    let request = CheckoutRequest::new(tender, config.operator(), Utc::now());
    let transaction = store.inner().checkout(&cart, request).await?;

    session.with_cart_mut(Cart::clear);

    info!(
        receipt = %transaction.id,
        total = %transaction.total,
        cashier = %transaction.cashier,
        "Sale completed"
    );

    Ok(ReceiptResponse::new(transaction, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::time::Duration;
    use till_store::Store;

    struct Register {
        store: StoreState,
        session: SessionState,
        config: RegisterConfig,
        processor: PaymentProcessor,
    }

    fn register() -> Register {
        Register {
            store: StoreState::new(Store::with_demo_data()),
            session: SessionState::new(),
            config: RegisterConfig::default(),
            processor: PaymentProcessor::new(Duration::from_millis(2000), Duration::from_millis(1500)),
        }
    }

    fn cash(cents: i64) -> PaymentRequest {
        PaymentRequest {
            method: "cash".to_string(),
            cash_received_cents: Some(cents),
        }
    }

    impl Register {
        async fn ring_up_two_coffees(&self) {
            let coffee = self.store.inner().products().get_by_id("1").await.unwrap();
            self.session.with_cart_mut(|c| {
                c.add_item(&coffee);
                c.add_item(&coffee);
                c.select_customer(Some("1".to_string()));
                c.set_discount_percentage(10.0).unwrap();
            });
        }

        async fn pay(&self, request: PaymentRequest) -> Result<ReceiptResponse, ApiError> {
            let (_handle, pending) = PaymentProcessor::begin();
            process_payment(
                &self.store,
                &self.session,
                &self.config,
                &self.processor,
                request,
                pending,
            )
            .await
        }
    }

    #[test]
    fn test_tender_parsing() {
        let card = PaymentRequest {
            method: "CARD".to_string(),
            cash_received_cents: Some(500),
        };
        assert_eq!(card.tender().unwrap(), Tender::card());

        assert_eq!(
            cash(6000).tender().unwrap(),
            Tender::cash(Money::from_cents(6000))
        );
        assert_eq!(cash(-1).tender().unwrap_err().code, ErrorCode::ValidationError);
        assert_eq!(
            cash(1_000_000_000_000_000).tender().unwrap_err().code,
            ErrorCode::ValidationError
        );

        let bogus = PaymentRequest {
            method: "cheque".to_string(),
            cash_received_cents: None,
        };
        assert_eq!(bogus.tender().unwrap_err().code, ErrorCode::ValidationError);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cash_sale_end_to_end() {
        let reg = register();
        reg.ring_up_two_coffees().await;

        let receipt = reg.pay(cash(6000)).await.unwrap();

        assert_eq!(receipt.transaction.total, Money::from_micros(48_980_400));
        assert_eq!(receipt.change_due, Some(Money::from_micros(11_019_600)));
        assert_eq!(receipt.loyalty_points_earned, Some(48));
        assert_eq!(receipt.formatted_change.as_deref(), Some("$11.02"));
        assert_eq!(receipt.transaction.cashier, "John Smith");

        assert!(reg.session.with_cart(Cart::is_empty));
        let coffee = reg.store.inner().products().get_by_id("1").await.unwrap();
        assert_eq!(coffee.stock, 43);
        let sarah = reg.store.inner().customers().get_by_id("1").await.unwrap();
        assert_eq!(sarah.loyalty_points, 245 + 48);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_cart_rejected() {
        let reg = register();

        let err = reg.pay(PaymentRequest {
            method: "card".to_string(),
            cash_received_cents: None,
        })
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_cash_fails_before_waiting() {
        let reg = register();
        reg.ring_up_two_coffees().await;
        let start = tokio::time::Instant::now();

        let err = reg.pay(cash(4000)).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::PaymentError);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(reg.session.with_cart(Cart::total_quantity), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_payment_records_nothing() {
        let reg = register();
        reg.ring_up_two_coffees().await;
        let (handle, pending) = PaymentProcessor::begin();

        let payment = process_payment(
            &reg.store,
            &reg.session,
            &reg.config,
            &reg.processor,
            cash(6000),
            pending,
        );
        let cancel = async {
            tokio::time::sleep(Duration::from_millis(1000)).await;
            handle.cancel();
        };
        let (result, ()) = tokio::join!(payment, cancel);

        assert_eq!(result.unwrap_err().code, ErrorCode::PaymentCancelled);
        assert_eq!(reg.session.with_cart(Cart::total_quantity), 2);
        assert_eq!(reg.store.inner().products().get_by_id("1").await.unwrap().stock, 45);
        assert_eq!(reg.store.inner().transactions().list().await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stock_sold_elsewhere_during_payment() {
        let reg = register();
        reg.ring_up_two_coffees().await;

        let mut coffee = reg.store.inner().products().get_by_id("1").await.unwrap();
        coffee.stock = 1;
        reg.store.inner().products().update(coffee).await.unwrap();

        let err = reg.pay(PaymentRequest {
            method: "digital".to_string(),
            cash_received_cents: None,
        })
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(reg.session.with_cart(Cart::total_quantity), 2);
    }
}
