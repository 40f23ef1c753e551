//! # Customer Commands
//!
//! Lookup and registration for the loyalty program. Points and spend are
//! only ever changed by a completed sale.

use tracing::debug;

use till_core::{Customer, NewCustomer};

use crate::error::ApiError;
use crate::state::StoreState;

/// Filters customers by name or email (case-insensitive) or phone digits.
/// An empty query lists everyone.
pub async fn search_customers(store: &StoreState, query: &str) -> Result<Vec<Customer>, ApiError> {
    debug!(query = %query, "search_customers command");
    Ok(store.inner().customers().search(query).await?)
}

/// Registers a customer with zero points and zero spend.
///
/// ## Returns
/// * `Err(VALIDATION_ERROR)` - Missing field, bad email, or email already on file
pub async fn add_customer(store: &StoreState, customer: NewCustomer) -> Result<Customer, ApiError> {
    debug!(name = %customer.name, "add_customer command");
    Ok(store.inner().customers().add(customer).await?)
}
