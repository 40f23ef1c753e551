//! # Command Bridge
//!
//! Line-delimited JSON between the front-end and the register: one request
//! object per input line, one response object per output line.
//!
//! ## Wire Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Request / Response                                   │
//! │                                                                         │
//! │  stdin  ► {"id": 1, "command": "add_to_cart", "product_id": "1"}        │
//! │  stdout ◄ {"id": 1, "ok": true, "data": {"lines": [...], ...}}          │
//! │                                                                         │
//! │  stdin  ► {"id": 2, "command": "set_discount", "percentage": 150}       │
//! │  stdout ◄ {"id": 2, "ok": false,                                        │
//! │            "error": {"code": "VALIDATION_ERROR", "message": "..."}}     │
//! │                                                                         │
//! │  `id` is optional and echoed back untouched.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Payments
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  process_payment ──► spawned task ──► response when the window ends    │
//! │        │                                                                │
//! │        │  meanwhile the loop keeps reading:                             │
//! │        │    cancel_payment ──► signals the task (PAYMENT_CANCELLED)     │
//! │        │    read-only commands ──► answered immediately                 │
//! │        │    cart changes / second payment ──► BUSINESS_LOGIC            │
//! │        ▼                                                                │
//! │  Responses may therefore arrive out of request order; match on `id`.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use till_core::{NewCustomer, NewProduct, Product};

use crate::commands::{self, sale::PaymentRequest};
use crate::error::ApiError;
use crate::payment::{PaymentCancelHandle, PaymentProcessor};
use crate::state::{RegisterConfig, SessionState, StoreState};

// =============================================================================
// Register
// =============================================================================

/// Every piece of state the commands draw on. Clones share the same store
/// and cart.
#[derive(Debug, Clone)]
pub struct Register {
    pub store: StoreState,
    pub session: SessionState,
    pub config: Arc<RegisterConfig>,
    pub payments: PaymentProcessor,
}

impl Register {
    /// Builds the register from configuration, seeding the store if asked.
    pub fn new(config: RegisterConfig) -> Self {
        let store = StoreState::from_config(&config);
        Register::with_store(config, store)
    }

    pub fn with_store(config: RegisterConfig, store: StoreState) -> Self {
        Register {
            store,
            session: SessionState::new(),
            payments: PaymentProcessor::from_config(&config.payment),
            config: Arc::new(config),
        }
    }

    /// Runs every command except the payment pair, which `serve` owns.
    async fn dispatch(&self, command: Command) -> Result<Value, ApiError> {
        let (store, session, config) = (&self.store, &self.session, &*self.config);

        match command {
            Command::GetCart => to_data(commands::cart::get_cart(store, session).await),
            Command::AddToCart { product_id } => {
                to_data(commands::cart::add_to_cart(store, session, &product_id).await?)
            }
            Command::UpdateCartItem {
                product_id,
                quantity,
            } => to_data(commands::cart::update_cart_item(store, session, &product_id, quantity).await?),
            Command::RemoveFromCart { product_id } => {
                to_data(commands::cart::remove_from_cart(store, session, &product_id).await)
            }
            Command::ClearCart => to_data(commands::cart::clear_cart(store, session).await),
            Command::SetDiscount { percentage } => {
                to_data(commands::cart::set_discount(store, session, percentage).await?)
            }
            Command::SelectCustomer { customer_id } => {
                to_data(commands::cart::select_customer(store, session, customer_id).await?)
            }
            Command::SearchProducts { query, category } => to_data(
                commands::product::search_products(store, config, &query, category.as_deref()).await?,
            ),
            Command::ListCategories => to_data(commands::product::list_categories(store).await),
            Command::AddProduct { product } => {
                to_data(commands::product::add_product(store, config, product).await?)
            }
            Command::UpdateProduct { product } => {
                to_data(commands::product::update_product(store, config, product).await?)
            }
            Command::InventoryOverview { query } => {
                to_data(commands::product::inventory_overview(store, config, &query).await?)
            }
            Command::SearchCustomers { query } => {
                to_data(commands::customer::search_customers(store, &query).await?)
            }
            Command::AddCustomer { customer } => {
                to_data(commands::customer::add_customer(store, customer).await?)
            }
            Command::SalesReport => to_data(commands::report::sales_report(store).await),
            Command::ListTransactions => to_data(commands::report::list_transactions(store).await),
            Command::GetTransaction { id } => {
                to_data(commands::report::get_transaction(store, &id).await?)
            }
            Command::GetConfig => to_data(commands::config::get_config(config)),
            Command::ProcessPayment { .. } | Command::CancelPayment => {
                Err(ApiError::internal("payment commands are handled by the bridge loop"))
            }
        }
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// A request, tagged by `command`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    GetCart,
    AddToCart {
        product_id: String,
    },
    UpdateCartItem {
        product_id: String,
        quantity: i64,
    },
    RemoveFromCart {
        product_id: String,
    },
    ClearCart,
    SetDiscount {
        percentage: f64,
    },
    SelectCustomer {
        #[serde(default)]
        customer_id: Option<String>,
    },
    SearchProducts {
        #[serde(default)]
        query: String,
        #[serde(default)]
        category: Option<String>,
    },
    ListCategories,
    AddProduct {
        product: NewProduct,
    },
    UpdateProduct {
        product: Product,
    },
    InventoryOverview {
        #[serde(default)]
        query: String,
    },
    SearchCustomers {
        #[serde(default)]
        query: String,
    },
    AddCustomer {
        customer: NewCustomer,
    },
    ProcessPayment {
        method: String,
        #[serde(default)]
        cash_received_cents: Option<i64>,
    },
    CancelPayment,
    SalesReport,
    ListTransactions,
    GetTransaction {
        id: String,
    },
    GetConfig,
}

impl Command {
    /// Commands refused while a payment is in flight.
    fn mutates_cart(&self) -> bool {
        matches!(
            self,
            Command::AddToCart { .. }
                | Command::UpdateCartItem { .. }
                | Command::RemoveFromCart { .. }
                | Command::ClearCart
                | Command::SetDiscount { .. }
                | Command::SelectCustomer { .. }
        )
    }
}

/// One output line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl Response {
    fn from_result(id: Option<Value>, result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(data) => Response {
                id,
                ok: true,
                data: Some(data),
                error: None,
            },
            Err(error) => Response {
                id,
                ok: false,
                data: None,
                error: Some(error),
            },
        }
    }

    fn failure(id: Option<Value>, error: ApiError) -> Self {
        Response::from_result(id, Err(error))
    }
}

fn to_data<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(format!("Failed to encode response: {}", e)))
}

/// Splits the optional `id` off before decoding the command, so even a bad
/// command gets its id echoed.
fn parse_request(line: &str) -> Result<(Option<Value>, Command), Response> {
    let mut value: Value = serde_json::from_str(line)
        .map_err(|e| Response::failure(None, ApiError::validation(format!("Invalid request: {}", e))))?;

    let id = value.as_object_mut().and_then(|fields| fields.remove("id"));

    match serde_json::from_value(value) {
        Ok(command) => Ok((id, command)),
        Err(e) => Err(Response::failure(
            id,
            ApiError::validation(format!("Invalid request: {}", e)),
        )),
    }
}

// =============================================================================
// Serve Loop
// =============================================================================

struct InFlightPayment {
    cancel: Option<PaymentCancelHandle>,
    task: JoinHandle<()>,
}

impl InFlightPayment {
    fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Waits for the payment task. A task that panicked never sent its
    /// response, so the failure is logged here.
    async fn finish(self) {
        if let Err(e) = self.task.await {
            warn!(error = %e, "Payment task failed without a response");
        }
    }
}

/// Serves requests from `input` until end of input, then waits for any
/// payment still in flight so its response is written.
pub async fn serve<R, W>(register: Register, input: R, mut output: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Response>();

    let writer = tokio::spawn(async move {
        while let Some(response) = rx.recv().await {
            let mut line = serde_json::to_vec(&response)?;
            line.push(b'\n');
            output.write_all(&line).await?;
            output.flush().await?;
        }
        Ok::<(), io::Error>(())
    });

    let mut payment: Option<InFlightPayment> = None;
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let (id, command) = match parse_request(&line) {
            Ok(request) => request,
            Err(response) => {
                warn!(line = %line, "Rejected malformed request");
                if tx.send(response).is_err() {
                    break;
                }
                continue;
            }
        };

        let busy = payment.as_ref().is_some_and(InFlightPayment::is_running);

        let response = match command {
            Command::ProcessPayment { .. } if busy => Response::failure(
                id,
                ApiError::business("A payment is already in progress"),
            ),
            Command::ProcessPayment {
                method,
                cash_received_cents,
            } => {
                if let Some(previous) = payment.take() {
                    previous.finish().await;
                }

                let (cancel, pending) = PaymentProcessor::begin();
                let register = register.clone();
                let tx = tx.clone();

                let task = tokio::spawn(async move {
                    let request = PaymentRequest {
                        method,
                        cash_received_cents,
                    };
                    let result = commands::sale::process_payment(
                        &register.store,
                        &register.session,
                        &register.config,
                        &register.payments,
                        request,
                        pending,
                    )
                    .await
                    .and_then(to_data);
                    let _ = tx.send(Response::from_result(id, result));
                });

                payment = Some(InFlightPayment {
                    cancel: Some(cancel),
                    task,
                });
                continue;
            }
            Command::CancelPayment => {
                match payment
                    .as_mut()
                    .filter(|p| p.is_running())
                    .and_then(|p| p.cancel.take())
                {
                    Some(handle) => {
                        let cancelled = handle.cancel();
                        debug!(cancelled, "cancel_payment command");
                        Response::from_result(id, Ok(json!({ "cancelled": cancelled })))
                    }
                    None => Response::failure(id, ApiError::business("No payment in progress")),
                }
            }
            command if busy && command.mutates_cart() => Response::failure(
                id,
                ApiError::business("Cart is locked while a payment is in progress"),
            ),
            command => Response::from_result(id, register.dispatch(command).await),
        };

        if tx.send(response).is_err() {
            break;
        }
    }

    if let Some(in_flight) = payment {
        if in_flight.is_running() {
            info!("Input closed, waiting for payment in flight");
        }
        in_flight.finish().await;
    }

    drop(tx);
    writer
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio::io::AsyncReadExt;

    fn register() -> Register {
        let mut config = RegisterConfig::default();
        config.payment.processing_delay_ms = 200;
        config.payment.confirmation_delay_ms = 100;
        Register::new(config)
    }

    /// Feeds `requests` and collects every response line keyed by id.
    async fn run(register: Register, requests: &[Value]) -> HashMap<i64, Value> {
        let input: String = requests.iter().map(|r| format!("{}\n", r)).collect();
        let (output, mut reader) = tokio::io::duplex(1 << 20);

        serve(register, input.as_bytes(), output).await.unwrap();

        let mut raw = String::new();
        reader.read_to_string(&mut raw).await.unwrap();

        raw.lines()
            .map(|line| serde_json::from_str::<Value>(line).unwrap())
            .map(|value| (value["id"].as_i64().unwrap_or(-1), value))
            .collect()
    }

    #[tokio::test]
    async fn test_panicked_payment_task_is_reaped() {
        let (cancel, _pending) = PaymentProcessor::begin();
        let task = tokio::spawn(async { panic!("authorization blew up") });
        let in_flight = InFlightPayment {
            cancel: Some(cancel),
            task,
        };

        in_flight.finish().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_amounts_rejected_without_crashing() {
        let responses = run(
            register(),
            &[
                json!({"id": 1, "command": "add_product", "product": {
                    "name": "Gold Bar", "price_cents": 1_000_000_000_000_000_i64,
                    "category": "Luxury", "stock": 5, "tax_rate_bps": 800,
                    "description": "", "image_url": "", "barcode": ""
                }}),
                json!({"id": 2, "command": "add_to_cart", "product_id": "1"}),
                json!({"id": 3, "command": "process_payment", "method": "cash",
                       "cash_received_cents": 1_000_000_000_000_000_i64}),
                json!({"id": 4, "command": "get_cart"}),
            ],
        )
        .await;

        assert_eq!(responses[&1]["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(responses[&3]["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(responses[&4]["data"]["totalQuantity"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cart_commands_round_trip() {
        let responses = run(
            register(),
            &[
                json!({"id": 1, "command": "add_to_cart", "product_id": "1"}),
                json!({"id": 2, "command": "add_to_cart", "product_id": "1"}),
                json!({"id": 3, "command": "set_discount", "percentage": 10}),
                json!({"id": 4, "command": "get_cart"}),
            ],
        )
        .await;

        assert_eq!(responses.len(), 4);
        let cart = &responses[&4]["data"];
        assert_eq!(cart["totalQuantity"], 2);
        assert_eq!(cart["totals"]["final_total"], 48_980_400);
        assert_eq!(responses[&2]["data"]["change"]["outcome"], "updated");
    }

    #[tokio::test(start_paused = true)]
    async fn test_payment_completes_after_input_closes() {
        let reg = register();
        let responses = run(
            reg.clone(),
            &[
                json!({"id": 1, "command": "add_to_cart", "product_id": "3"}),
                json!({"id": 2, "command": "process_payment", "method": "cash", "cash_received_cents": 1000}),
                json!({"id": 3, "command": "add_to_cart", "product_id": "3"}),
                json!({"id": 4, "command": "process_payment", "method": "card"}),
            ],
        )
        .await;

        assert_eq!(responses[&2]["ok"], true);
        assert_eq!(responses[&2]["data"]["transaction"]["payment_method"], "cash");
        assert_eq!(responses[&3]["error"]["code"], "BUSINESS_LOGIC");
        assert_eq!(responses[&4]["error"]["code"], "BUSINESS_LOGIC");

        assert_eq!(reg.store.inner().products().get_by_id("3").await.unwrap().stock, 66);
        assert!(reg.session.with_cart(till_core::Cart::is_empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_payment() {
        let reg = register();
        let responses = run(
            reg.clone(),
            &[
                json!({"id": 1, "command": "add_to_cart", "product_id": "2"}),
                json!({"id": 2, "command": "process_payment", "method": "digital"}),
                json!({"id": 3, "command": "cancel_payment"}),
                json!({"id": 4, "command": "cancel_payment"}),
            ],
        )
        .await;

        assert_eq!(responses[&3]["data"], json!({"cancelled": true}));
        assert_eq!(responses[&4]["ok"], false);
        assert_eq!(responses[&2]["error"]["code"], "PAYMENT_CANCELLED");

        assert_eq!(reg.store.inner().transactions().list().await.len(), 2);
        assert_eq!(reg.session.with_cart(till_core::Cart::total_quantity), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_requests() {
        let input = "not json\n{\"id\": 9, \"command\": \"launch_rocket\"}\n";
        let (output, mut reader) = tokio::io::duplex(1 << 16);

        serve(register(), input.as_bytes(), output).await.unwrap();

        let mut raw = String::new();
        reader.read_to_string(&mut raw).await.unwrap();
        let lines: Vec<Value> = raw.lines().map(|l| serde_json::from_str(l).unwrap()).collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["ok"], false);
        assert_eq!(lines[0]["error"]["code"], "VALIDATION_ERROR");
        assert!(lines[0].get("id").is_none());
        assert_eq!(lines[1]["id"], 9);
        assert_eq!(lines[1]["error"]["code"], "VALIDATION_ERROR");
    }
}
