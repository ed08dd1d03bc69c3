//! Tally CLI - Budget-allocation advisor
//!
//! Usage:
//!   tally recommend --file snapshot.json    Compute recommendations
//!   tally metrics --file snapshot.json      Show derived metrics
//!   tally tiers                             Show the tier table
//!   tally dismiss --kind enjoy              Hide a type for the month

mod cli;
mod commands;
mod store;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Recommend {
            file,
            date,
            json,
            all,
        } => commands::cmd_recommend(&file, date.as_deref(), config, cli.state, json, all),
        Commands::Metrics { file, date } => commands::cmd_metrics(&file, date.as_deref(), config),
        Commands::Tiers => commands::cmd_tiers(config),
        Commands::Dismiss { kind, date } => {
            commands::cmd_dismiss(&kind, date.as_deref(), cli.state)
        }
        Commands::Restore { kind, date } => {
            commands::cmd_restore(kind.as_deref(), date.as_deref(), cli.state)
        }
    }
}
