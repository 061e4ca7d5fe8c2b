//! Import command implementation

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use finsight_core::{import, Snapshot};

pub fn cmd_import(file: &Path, snapshot_path: &Path, user_id: i64) -> Result<()> {
    println!("📥 Importing transactions from {}...", file.display());

    let reader =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let rows = import::parse_csv(reader, user_id).context("Failed to parse CSV")?;
    println!("   Parsed {} rows", rows.len());

    let mut snapshot = if snapshot_path.exists() {
        import::load_snapshot(snapshot_path)
            .with_context(|| format!("Failed to load snapshot {}", snapshot_path.display()))?
    } else {
        println!("   Creating new snapshot at {}", snapshot_path.display());
        Snapshot::default()
    };

    let stats = snapshot.append_transactions(rows);
    snapshot
        .validate()
        .context("Imported data failed validation")?;
    import::save_snapshot(snapshot_path, &snapshot)
        .with_context(|| format!("Failed to write snapshot {}", snapshot_path.display()))?;

    println!();
    println!("✅ Import complete!");
    println!("   Imported: {}", stats.imported);
    println!("   Skipped (duplicate id): {}", stats.skipped);
    println!("   Snapshot now holds {} transactions", snapshot.transactions.len());

    Ok(())
}
