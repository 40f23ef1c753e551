//! # till-store: In-Memory State for Till POS
//!
//! Owns the catalog, customer list and sales ledger, and applies checkouts
//! atomically across all three.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Till POS Data Flow                               │
//! │                                                                         │
//! │  Register command (process_payment)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     till-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │  Repositories │    │    Seed      │  │   │
//! │  │   │  (store.rs)   │    │               │    │  (seed.rs)   │  │   │
//! │  │   │               │    │ ProductRepo   │    │              │  │   │
//! │  │   │ Arc<Mutex<    │◄───│ CustomerRepo  │    │ demo catalog │  │   │
//! │  │   │   Tables>>    │    │ TransactionRepo│   │ demo history │  │   │
//! │  │   │ checkout()    │    │               │    │              │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  └───────────┼─────────────────────────────────────────────────────┘   │
//! │              ▼                                                          │
//! │  till_core::checkout::plan_checkout (pure validation + effects)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The shared tables handle and atomic checkout
//! - [`repository`] - Product, customer and transaction access
//! - [`seed`] - Demo catalog, customers and history
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use till_store::Store;
//!
//! let store = Store::with_demo_data();
//!
//! let teas = store.products().search("tea", Some("Beverages")).await?;
//! let txn = store.checkout(&cart, request).await?;
//! let report = store.transactions().summary().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod repository;
pub mod seed;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use store::Store;

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::transaction::{SalesSummary, TransactionRepository};
