//! Finsight CLI - Personal finance insights
//!
//! Usage:
//!   finsight import --file tx.csv        Import transactions into snapshot.json
//!   finsight insights                    Show the dashboard for this month
//!   finsight budgets --now 2026-06-10    Budget alerts and risks as of a date
//!   finsight insights --json             Machine-readable output

mod cli;
mod commands;


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
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Insights { snapshot, json } => {
            commands::cmd_insights(&snapshot, config_path, json)
        }
        Commands::Budgets { snapshot } => commands::cmd_budgets(&snapshot, config_path),
        Commands::Goals { snapshot } => commands::cmd_goals(&snapshot, config_path),
        Commands::Patterns { snapshot } => commands::cmd_patterns(&snapshot, config_path),
        Commands::Subscriptions { snapshot } => {
            commands::cmd_subscriptions(&snapshot, config_path)
        }
        Commands::Import {
            file,
            snapshot,
            user,
        } => commands::cmd_import(&file, &snapshot, user),
        Commands::Config => commands::cmd_config(config_path),
    }
}
