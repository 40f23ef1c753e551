//! # Register Configuration
//!
//! Configuration loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TILL_OPERATOR="Jane Doe"                                           │
//! │     TILL_PAYMENT_DELAY_MS=500                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $TILL_CONFIG, or                                                   │
//! │     ~/.config/pos/register.toml (Linux)                                │
//! │     ~/Library/Application Support/com.till.pos/register.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     "Till POS Demo Store", 2s + 1.5s payment, low stock below 10       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # register.toml
//! [store]
//! name = "Corner Café"
//! address = ["12 Market Street", "Springfield"]
//! currency_code = "USD"
//! currency_symbol = "$"
//!
//! [session]
//! operator = "John Smith"
//!
//! [payment]
//! processing_delay_ms = 2000
//! confirmation_delay_ms = 1500
//!
//! [inventory]
//! low_stock_threshold = 10
//!
//! [catalog]
//! seed_demo_data = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use till_core::{Money, DEFAULT_LOW_STOCK_THRESHOLD};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "TILL_CONFIG";

// =============================================================================
// Config Error
// =============================================================================

/// Failures while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Sections
// =============================================================================

/// Store identity printed on receipts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Address lines (for receipts)
    #[serde(default = "default_store_address")]
    pub address: Vec<String>,

    /// Currency code (ISO 4217)
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "Till POS Demo Store".to_string()
}

fn default_store_address() -> Vec<String> {
    vec!["123 Main Street".to_string(), "City, ST 12345".to_string()]
}

fn default_currency_code() -> String {
    "USD".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            address: default_store_address(),
            currency_code: default_currency_code(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// The signed-in register session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Cashier name recorded on every transaction.
    #[serde(default = "default_operator")]
    pub operator: String,
}

fn default_operator() -> String {
    "John Smith".to_string()
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            operator: default_operator(),
        }
    }
}

/// Simulated payment terminal timing.
///
/// ```text
/// process_payment ──► processing (2000 ms) ──► confirmation (1500 ms) ──► checkout
///                     └──────────── cancellable ───────────────────┘
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSettings {
    #[serde(default = "default_processing_delay")]
    pub processing_delay_ms: u64,

    /// Pause on the success screen before the sale completes.
    #[serde(default = "default_confirmation_delay")]
    pub confirmation_delay_ms: u64,
}

fn default_processing_delay() -> u64 {
    2000
}

fn default_confirmation_delay() -> u64 {
    1500
}

impl Default for PaymentSettings {
    fn default() -> Self {
        PaymentSettings {
            processing_delay_ms: default_processing_delay(),
            confirmation_delay_ms: default_confirmation_delay(),
        }
    }
}

impl PaymentSettings {
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    pub fn confirmation_delay(&self) -> Duration {
        Duration::from_millis(self.confirmation_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySettings {
    /// Stock strictly below this is flagged as low.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
}

fn default_low_stock_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Start with the demo products, customers and sales history.
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            seed_demo_data: true,
        }
    }
}

// =============================================================================
// Register Config
// =============================================================================

/// Complete register configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub payment: PaymentSettings,

    #[serde(default)]
    pub inventory: InventorySettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl RegisterConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else the platform config dir)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading register config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Path from `TILL_CONFIG`, if set.
    pub fn path_from_env() -> Option<PathBuf> {
        std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.operator.trim().is_empty() {
            return Err(ConfigError::Invalid("session.operator must not be empty".into()));
        }

        if self.inventory.low_stock_threshold <= 0 {
            return Err(ConfigError::Invalid(
                "inventory.low_stock_threshold must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(operator) = std::env::var("TILL_OPERATOR") {
            debug!(operator = %operator, "Overriding operator from environment");
            self.session.operator = operator;
        }

        if let Ok(name) = std::env::var("TILL_STORE_NAME") {
            self.store.name = name;
        }

        if let Ok(delay) = std::env::var("TILL_PAYMENT_DELAY_MS") {
            match delay.parse::<u64>() {
                Ok(ms) => {
                    debug!(ms, "Overriding payment processing delay from environment");
                    self.payment.processing_delay_ms = ms;
                }
                Err(_) => warn!(value = %delay, "Ignoring non-numeric TILL_PAYMENT_DELAY_MS"),
            }
        }

        if let Ok(threshold) = std::env::var("TILL_LOW_STOCK_THRESHOLD") {
            if let Ok(t) = threshold.parse::<i64>() {
                debug!(threshold = t, "Overriding low-stock threshold from environment");
                self.inventory.low_stock_threshold = t;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "till", "pos")
            .map(|dirs| dirs.config_dir().join("register.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Cashier name for new sales.
    pub fn operator(&self) -> &str {
        &self.session.operator
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.inventory.low_stock_threshold
    }

    /// Formats an amount for receipts, rounded to cents.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = RegisterConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.round_to_cents();
        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.store.currency_symbol,
            (cents / 100).abs(),
            (cents % 100).abs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "till-register-{}-{}.toml",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = RegisterConfig::default();
        assert_eq!(config.operator(), "John Smith");
        assert_eq!(config.payment.processing_delay_ms, 2000);
        assert_eq!(config.payment.confirmation_delay_ms, 1500);
        assert_eq!(config.low_stock_threshold(), 10);
        assert!(config.catalog.seed_demo_data);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = RegisterConfig::default();

        config.session.operator = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.session.operator = "Jane".to_string();
        config.inventory.low_stock_threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_config(
            "partial",
            "[store]\nname = \"Corner Cafe\"\n\n[payment]\nprocessing_delay_ms = 10\n",
        );

        let config = RegisterConfig::load(Some(path.clone())).unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(config.store.name, "Corner Cafe");
        assert_eq!(config.store.currency_symbol, "$");
        assert_eq!(config.payment.processing_delay_ms, 10);
        assert_eq!(config.payment.confirmation_delay_ms, 1500);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let path = temp_config("malformed", "[payment\nprocessing_delay_ms = ");

        let result = RegisterConfig::load(Some(path.clone()));
        std::fs::remove_file(path).ok();

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_toml_serialization() {
        let config = RegisterConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[payment]"));
    }

    #[test]
    fn test_format_currency() {
        let config = RegisterConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
        assert_eq!(config.format_currency(Money::from_micros(53_978_400)), "$53.98");
        assert_eq!(config.format_currency(Money::zero()), "$0.00");
        assert_eq!(config.format_currency(Money::from_cents(-1234)), "-$12.34");
    }
}
