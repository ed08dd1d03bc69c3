//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Budget-allocation advisor
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Turn a financial snapshot into a safe-to-spend split", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Engine configuration file (tier table, thresholds); defaults apply
    /// when absent
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Dismissal state file
    #[arg(long, default_value = "tally-state.json", global = true)]
    pub state: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute budget recommendations from a snapshot file
    Recommend {
        /// JSON snapshot of accounts, transactions, projects, objectives
        #[arg(short, long)]
        file: PathBuf,

        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Emit the full advice as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Include recommendations dismissed this month
        #[arg(long)]
        all: bool,
    },

    /// Show the derived metrics for a snapshot file
    Metrics {
        /// JSON snapshot file
        #[arg(short, long)]
        file: PathBuf,

        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show the tier-allocation table in effect
    Tiers,

    /// Dismiss a recommendation type for the current month
    Dismiss {
        /// Recommendation type: save, invest, enjoy, keep
        #[arg(short, long)]
        kind: String,

        /// Month to dismiss in (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Restore dismissed recommendation types for the current month
    Restore {
        /// Recommendation type to restore (all types when omitted)
        #[arg(short, long)]
        kind: Option<String>,

        /// Month to restore in (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
}
