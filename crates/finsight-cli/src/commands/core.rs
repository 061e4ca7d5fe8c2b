//! Shared utilities for the insight commands
//!
//! This module contains:
//! - `load_config` - Resolve the engine config (flag, data dir, built-in)
//! - `open_snapshot` - Load a snapshot file, optionally narrowed to one user
//! - `resolve_now` - Parse `--now` or fall back to today

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use finsight_core::{import, InsightsConfig, InsightsEngine, Snapshot};

use crate::cli::SnapshotArgs;

pub fn load_config(config_path: Option<&Path>) -> Result<InsightsConfig> {
    InsightsConfig::load(config_path).context("Failed to load engine config")
}

/// Load a snapshot file and narrow it to `user` when given
pub fn open_snapshot(path: &Path, user: Option<i64>) -> Result<Snapshot> {
    let snapshot = import::load_snapshot(path)
        .with_context(|| format!("Failed to load snapshot {}", path.display()))?;

    Ok(match user {
        Some(user_id) => snapshot.for_user(user_id),
        None => snapshot,
    })
}

pub fn resolve_now(now: Option<&str>) -> Result<NaiveDate> {
    match now {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .context("Invalid --now date format (use YYYY-MM-DD)"),
        None => Ok(Local::now().date_naive()),
    }
}

/// Everything an insight command needs: the engine, the snapshot and the date
pub fn prepare(
    args: &SnapshotArgs,
    config_path: Option<&Path>,
) -> Result<(InsightsEngine, Snapshot, NaiveDate)> {
    let config = load_config(config_path)?;
    let snapshot = open_snapshot(&args.snapshot, args.user)?;
    let now = resolve_now(args.now.as_deref())?;

    tracing::debug!(
        snapshot = %args.snapshot.display(),
        transactions = snapshot.transactions.len(),
        as_of = %now,
        "Snapshot ready"
    );

    Ok((InsightsEngine::with_config(config), snapshot, now))
}
