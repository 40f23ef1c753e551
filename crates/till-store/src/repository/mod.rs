//! # Repository Module
//!
//! Table access for Till POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Register command                                                      │
//! │       │                                                                 │
//! │       │  store.products().search("tea", Some("Beverages"))             │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list / get_by_id                                                  │
//! │  ├── add / update           ← validated, logged                        │
//! │  └── search / low_stock     ← filters the grid and inventory screens   │
//! │       │                                                                 │
//! │       │  lock().await                                                   │
//! │       ▼                                                                 │
//! │  Arc<Mutex<Tables>> (shared with every other repository)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method takes the lock for its own duration only. Work that has to
//! span several tables atomically belongs on `Store` (see `Store::checkout`).
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog CRUD and search
//! - [`CustomerRepository`](customer::CustomerRepository) - Customer records
//! - [`TransactionRepository`](transaction::TransactionRepository) - Sales ledger and reports

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::store::Tables;

pub mod customer;
pub mod product;
pub mod transaction;

/// Tables handle shared by every repository.
pub(crate) type SharedTables = Arc<Mutex<Tables>>;
