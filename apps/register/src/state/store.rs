//! # Store State
//!
//! Wraps the `Store` handle for use in commands.
//!
//! ## Thread Safety
//! `Store` is a cheap clone around one `tokio::sync::Mutex` over every
//! table. Repository calls lock briefly; `checkout` holds the lock across
//! planning and applying a sale.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn search_products(
//!     store: &StoreState,
//!     query: &str,
//!     category: Option<&str>,
//! ) -> Result<Vec<Product>, ApiError> {
//!     Ok(store.inner().products().search(query, category).await?)
//! }
//! ```

use till_store::Store;

use crate::state::config::RegisterConfig;

/// Wrapper around `Store` for command state.
#[derive(Debug, Clone)]
pub struct StoreState {
    store: Store,
}

impl StoreState {
    /// Creates a new StoreState wrapping the store.
    pub fn new(store: Store) -> Self {
        StoreState { store }
    }

    /// Builds the startup store: the demo catalog, customers and history
    /// when `catalog.seed_demo_data` is on, otherwise empty tables.
    pub fn from_config(config: &RegisterConfig) -> Self {
        if config.catalog.seed_demo_data {
            StoreState::new(Store::with_demo_data())
        } else {
            StoreState::new(Store::new())
        }
    }

    /// Returns a reference to the inner Store.
    pub fn inner(&self) -> &Store {
        &self.store
    }
}
