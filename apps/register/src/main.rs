//! # Till Register Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Till POS Register                                │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Front-end process                           │  │
//! │  │  • Product Grid         • Cart Panel                             │  │
//! │  │  • Payment Modal        • Inventory / Customers / Reports        │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                  JSON lines on stdin / stdout                           │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    till-register (this binary)                   │  │
//! │  │                                                                  │  │
//! │  │  main.rs ────► Starts the runtime                                │  │
//! │  │  lib.rs ─────► Logging, config, state, bridge                    │  │
//! │  │  commands/ ──► add_to_cart, process_payment, sales_report, ...   │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match till_register::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("till-register: {}", e);
            ExitCode::FAILURE
        }
    }
}
