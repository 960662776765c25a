//! # dpp - Digital Product Passport Server
//!
//! The main binary for the passport record store.
//!
//! This application provides:
//! - HTTP REST API server (axum-based) over the in-memory passport core
//! - CLI interface for offline graph derivation and aggregation
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                  apps/dpp (THE BINARY)                 │
//! │                                                        │
//! │   ┌─────────────┐              ┌─────────────┐         │
//! │   │   CLI       │              │   HTTP API  │         │
//! │   │  (clap)     │              │   (axum)    │         │
//! │   └──────┬──────┘              └──────┬──────┘         │
//! │          │                            │                │
//! │          └──────────────┬─────────────┘                │
//! │                         ▼                              │
//! │                 ┌───────────────┐                      │
//! │                 │   dpp-core    │                      │
//! │                 │  (THE LOGIC)  │                      │
//! │                 └───────────────┘                      │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server with a seed bundle
//! dpp server --host 0.0.0.0 --port 8080 --seed passports.json
//!
//! # Offline operations
//! dpp status --seed passports.json
//! dpp graph --seed passports.json --id DPP001
//! dpp stats --seed passports.json --by countries
//! ```

use clap::Parser;
use dpp::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — DPP_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("DPP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dpp=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r"
  ·▄▄▄▄  ▄▄▄·▄▄▄·
  ██· ██▐█ ▀█▐█ ▀█   Digital Product Passport v{}
  ██▪ ▐█▄█▀▀█▄█▀▀█   record store · graph views · ledger mock
  ▀▀▀▀▀• ▀  ▀ ▀  ▀
",
        env!("CARGO_PKG_VERSION")
    );
}
