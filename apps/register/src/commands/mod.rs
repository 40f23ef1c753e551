//! # Commands Module
//!
//! Everything the front-end can ask the register to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── cart.rs      ◄─── Cart manipulation, discount, customer selection
//! ├── product.rs   ◄─── Product grid, inventory screen
//! ├── customer.rs  ◄─── Customer lookup and registration
//! ├── sale.rs      ◄─── Payment and checkout
//! ├── report.rs    ◄─── Dashboard and history
//! └── config.rs    ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Front-end writes one JSON line:                                        │
//! │  {"id": 7, "command": "add_to_cart", "product_id": "1"}                 │
//! │         │                                                               │
//! │         │ (stdin, bridge.rs)                                            │
//! │         ▼                                                               │
//! │  pub async fn add_to_cart(                                              │
//! │      store: &StoreState,      ◄── Only the state it needs              │
//! │      session: &SessionState,                                            │
//! │      product_id: &str,        ◄── From the request                     │
//! │  ) -> Result<CartResponse, ApiError>                                    │
//! │         │                                                               │
//! │         │ (stdout, JSON line)                                           │
//! │         ▼                                                               │
//! │  {"id": 7, "ok": true, "data": {"lines": [...], ...}}                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod config;
pub mod customer;
pub mod product;
pub mod report;
pub mod sale;
