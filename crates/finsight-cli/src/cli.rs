//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Finsight - Personal finance insights
#[derive(Parser)]
#[command(name = "finsight")]
#[command(about = "Budgets, forecasts and savings pacing from your transactions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Engine config file (defaults to the data-dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments shared by every command that reads a snapshot
#[derive(Args, Clone)]
pub struct SnapshotArgs {
    /// Snapshot JSON file (transactions, budgets, goals)
    #[arg(short, long, default_value = "snapshot.json")]
    pub snapshot: PathBuf,

    /// Reference date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub now: Option<String>,

    /// Only consider records of this user
    #[arg(short, long)]
    pub user: Option<i64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the full insights dashboard
    Insights {
        #[command(flatten)]
        snapshot: SnapshotArgs,

        /// Print the insights as JSON instead of a dashboard
        #[arg(long)]
        json: bool,
    },

    /// Show budget alerts, overrun risks and budget health
    Budgets {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },

    /// Show savings goal pacing
    Goals {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },

    /// Show spending trend and behavioural patterns
    Patterns {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },

    /// Show active recurring charges and their yearly cost
    Subscriptions {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },

    /// Import transactions from CSV into a snapshot file
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,

        /// Snapshot file to append to (created if missing)
        #[arg(short, long, default_value = "snapshot.json")]
        snapshot: PathBuf,

        /// User id for rows without a user_id column
        #[arg(short, long, default_value = "1")]
        user: i64,
    },

    /// Print the resolved engine configuration
    Config,
}
