//! # State Module
//!
//! Register state, split into focused types so each command declares
//! exactly what it touches.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  StoreState  │  │ SessionState │  │  RegisterConfig  │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Store       │  │  Arc<Mutex<  │  │  store identity  │              │
//! │  │  (catalog,   │  │    Cart      │  │  operator        │              │
//! │  │   customers, │  │  >>          │  │  payment timing  │              │
//! │  │   ledger)    │  │              │  │  low-stock level │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • StoreState: one tokio Mutex over every table                       │
//! │  • SessionState: std Mutex, short synchronous sections                 │
//! │  • RegisterConfig: read-only after startup                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
mod session;
mod store;

pub use config::{ConfigError, RegisterConfig};
pub use session::SessionState;
pub use store::StoreState;
