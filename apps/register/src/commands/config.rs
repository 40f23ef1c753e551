//! # Config Commands
//!
//! Retrieving register configuration.

use serde::Serialize;
use tracing::debug;

use crate::state::RegisterConfig;

/// Configuration as the front-end sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub store_name: String,
    pub store_address: Vec<String>,
    pub currency_code: String,
    pub currency_symbol: String,
    pub operator: String,
    pub low_stock_threshold: i64,
    pub processing_delay_ms: u64,
    pub confirmation_delay_ms: u64,
}

/// Gets the current register configuration.
///
/// ## When Used
/// - Start-up (header, cashier name)
/// - Receipt printing (store name, address)
/// - Inventory badges (low-stock threshold)
pub fn get_config(config: &RegisterConfig) -> ConfigResponse {
    debug!("get_config command");
    ConfigResponse {
        store_name: config.store.name.clone(),
        store_address: config.store.address.clone(),
        currency_code: config.store.currency_code.clone(),
        currency_symbol: config.store.currency_symbol.clone(),
        operator: config.session.operator.clone(),
        low_stock_threshold: config.inventory.low_stock_threshold,
        processing_delay_ms: config.payment.processing_delay_ms,
        confirmation_delay_ms: config.payment.confirmation_delay_ms,
    }
}
