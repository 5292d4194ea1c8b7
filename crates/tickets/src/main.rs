// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator CLI for the ticket staleness sweep.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod config_cmd;
mod stale_cmd;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tickets_config::TicketsConfig;
use tickets_core::TicketsError;

/// Inspect and manage stale ticket tracking.
#[derive(Parser, Debug)]
#[command(name = "tickets", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect persisted stale tickets.
    Stale {
        #[command(subcommand)]
        command: StaleCommand,
    },
    /// Configuration tools.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum StaleCommand {
    /// List tickets currently tracked as stale.
    List {
        /// Output JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Stop tracking a ticket as stale.
    Clear {
        /// Ticket (channel) id.
        ticket_id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the configuration and print the effective values.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => tickets_config::load_and_validate_path(path),
        None => tickets_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            tickets_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    tickets::init_tracing(&config.daemon.log_level);

    if let Err(e) = run(cli.command, &config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &TicketsConfig) -> Result<(), TicketsError> {
    match command {
        Commands::Stale { command } => match command {
            StaleCommand::List { json, plain } => {
                stale_cmd::run_list(&config.storage, json, plain).await
            }
            StaleCommand::Clear { ticket_id } => {
                stale_cmd::run_clear(&config.storage, &ticket_id).await?;
                Ok(())
            }
        },
        Commands::Config { command } => match command {
            ConfigCommand::Check => config_cmd::run_check(config),
        },
    }
}
