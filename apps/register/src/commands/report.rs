//! # Report Commands
//!
//! The reports dashboard and the transaction history list.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Total Sales    Transactions    Avg. Transaction    Items Sold         │
//! │  $91.37         2               $45.69              7                  │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Recent Transactions (newest first, 10 max)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use till_core::Transaction;
use till_store::SalesSummary;

use crate::error::ApiError;
use crate::state::StoreState;

/// How many sales the dashboard lists under the summary cards.
pub const RECENT_TRANSACTIONS: usize = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub summary: SalesSummary,
    pub recent: Vec<Transaction>,
}

/// Summary figures plus the most recent sales.
pub async fn sales_report(store: &StoreState) -> SalesReport {
    debug!("sales_report command");

    let ledger = store.inner().transactions();
    SalesReport {
        summary: ledger.summary().await,
        recent: ledger.recent(RECENT_TRANSACTIONS).await,
    }
}

/// Every sale, newest first.
pub async fn list_transactions(store: &StoreState) -> Vec<Transaction> {
    debug!("list_transactions command");
    store.inner().transactions().list().await
}

/// A single sale by receipt id, for reprinting.
pub async fn get_transaction(store: &StoreState, id: &str) -> Result<Transaction, ApiError> {
    debug!(id = %id, "get_transaction command");
    store
        .inner()
        .transactions()
        .get_by_id(id)
        .await
        .ok_or_else(|| ApiError::not_found("Transaction", id))
}
