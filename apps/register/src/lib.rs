//! # Till Register Library
//!
//! The register process: session cart, simulated payment terminal and the
//! command bridge the front-end talks to.
//!
//! ## Module Organization
//! ```text
//! till_register/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── bridge.rs       ◄─── JSON-lines request/response loop
//! ├── payment.rs      ◄─── Cancellable payment authorization
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── store.rs    ◄─── Store wrapper
//! │   ├── session.rs  ◄─── Active cart
//! │   └── config.rs   ◄─── Register configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   ├── product.rs  ◄─── Product grid / inventory commands
//! │   ├── customer.rs ◄─── Customer commands
//! │   ├── sale.rs     ◄─── Payment & checkout
//! │   ├── report.rs   ◄─── Dashboard & history
//! │   └── config.rs   ◄─── Configuration retrieval
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod bridge;
pub mod commands;
pub mod error;
pub mod payment;
pub mod state;

use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bridge::Register;
use state::RegisterConfig;

/// Runs the register until standard input closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Register Startup                                  │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info,till=debug, override with RUST_LOG                  │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → register.toml ($TILL_CONFIG or config dir) → env       │
/// │                                                                         │
/// │  3. Build State ──────────────────────────────────────────────────────► │
/// │     • StoreState: demo catalog/customers/history if seed_demo_data      │
/// │     • SessionState: empty cart                                          │
/// │     • PaymentProcessor: delays from [payment]                           │
/// │                                                                         │
/// │  4. Serve ────────────────────────────────────────────────────────────► │
/// │     • stdin requests → stdout responses until EOF                       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = RegisterConfig::load(RegisterConfig::path_from_env())?;
    info!(
        store = %config.store.name,
        operator = %config.operator(),
        seeded = config.catalog.seed_demo_data,
        "Starting Till POS register"
    );

    let register = Register::new(config);
    bridge::serve(register, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;

    info!("Input closed, register stopped");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr; stdout carries bridge responses only.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=till=trace` - Show trace for till crates only
/// - Default: `info,till=debug`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,till=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
