//! # Passport CLI Module
//!
//! This module implements the CLI interface for the passport server.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server (optionally pre-seeded)
//! - `status` - Show store counters for a seed bundle
//! - `graph` - Derive the relationship graph of one record
//! - `stats` - Aggregate a seed bundle by country, category or status
//!
//! Offline commands operate on a JSON seed bundle (`--seed <file>`) of
//! passports and suppliers; there is no durable store to open.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use dpp_core::DppError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Digital Product Passport server.
///
/// An in-memory store of product passports with derived relationship
/// graphs, compliance aggregations and a simulated ledger boundary.
#[derive(Parser, Debug)]
#[command(name = "dpp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a JSON seed bundle of passports and suppliers
    #[arg(short, long, global = true)]
    pub seed: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Aggregation dimension for the `stats` command.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StatsDimension {
    Countries,
    Categories,
    Status,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Show store counters for the seed bundle
    Status,

    /// Derive the relationship graph of one record
    Graph {
        /// Passport record id
        #[arg(short, long)]
        id: String,
    },

    /// Aggregate the seed bundle
    Stats {
        /// Dimension to aggregate by
        #[arg(short, long, value_enum, default_value_t = StatsDimension::Countries)]
        by: StatsDimension,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), DppError> {
    let seed = cli.seed.as_deref();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(seed, &host, port).await,
        Some(Commands::Graph { id }) => cmd_graph(seed, &id, json_mode),
        Some(Commands::Stats { by }) => cmd_stats(seed, by, json_mode),
        // No subcommand - show status by default
        Some(Commands::Status) | None => cmd_status(seed, json_mode),
    }
}
