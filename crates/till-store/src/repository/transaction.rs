//! # Transaction Repository
//!
//! Read access to the sales ledger. Transactions are only ever written by
//! `Store::checkout`, newest first, and never edited afterwards.
//!
//! ## Report Figures
//! ```text
//! total_sales          = Σ transaction.total
//! transaction_count    = number of transactions
//! average_transaction  = total_sales / transaction_count   (0 when empty)
//! items_sold           = Σ line.quantity over every transaction
//! ```

use serde::Serialize;
use till_core::{Money, Transaction};

use super::SharedTables;

/// Figures for the reports dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_sales: Money,
    pub transaction_count: usize,
    pub average_transaction: Money,
    pub items_sold: i64,
}

impl SalesSummary {
    /// Folds a set of transactions into report figures.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let total_sales: Money = transactions.iter().map(|t| t.total).sum();
        let transaction_count = transactions.len();
        let items_sold = transactions.iter().map(Transaction::item_count).sum();

        let average_transaction = if transaction_count == 0 {
            Money::zero()
        } else {
            Money::from_micros(total_sales.micros() / transaction_count as i64)
        };

        SalesSummary {
            total_sales,
            transaction_count,
            average_transaction,
            items_sold,
        }
    }
}

/// Repository for the sales ledger.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    tables: SharedTables,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub(crate) fn new(tables: SharedTables) -> Self {
        TransactionRepository { tables }
    }

    /// Every transaction, most recent first.
    pub async fn list(&self) -> Vec<Transaction> {
        self.tables.lock().await.transactions.clone()
    }

    /// The `limit` most recent transactions.
    pub async fn recent(&self, limit: usize) -> Vec<Transaction> {
        self.tables
            .lock()
            .await
            .transactions
            .iter()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Gets a transaction by receipt id.
    pub async fn get_by_id(&self, id: &str) -> Option<Transaction> {
        self.tables
            .lock()
            .await
            .transactions
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    /// Report figures over the whole ledger.
    pub async fn summary(&self) -> SalesSummary {
        SalesSummary::from_transactions(&self.tables.lock().await.transactions)
    }
}
