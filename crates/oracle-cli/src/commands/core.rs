//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `cmd_seed` - Insert demo agency records
//! - `cmd_snapshot` - Print the current financial snapshot

use std::path::Path;

use anyhow::{Context, Result};

use oracle_core::models::format_cents;
use oracle_core::{Database, SnapshotBuilder};

/// Open the database at the given path, running migrations as needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path.to_str().context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;

    println!("✅ Database initialized at {}", db.path());
    println!();
    println!("Next steps:");
    println!("  1. Seed demo records: oracle seed");
    println!("  2. Run a simulation:  oracle simulate --churn 15");

    Ok(())
}

pub fn cmd_seed(db_path: &Path) -> Result<()> {
    let db = open_db(db_path)?;
    db.seed_demo_records().context("Failed to seed demo records")?;

    println!("✅ Demo agency records seeded");
    Ok(())
}

pub fn cmd_snapshot(db_path: &Path) -> Result<()> {
    let db = open_db(db_path)?;
    let (snapshot, degraded) = SnapshotBuilder::new(&db).build();

    println!();
    println!("📊 Financial Snapshot");
    println!("   ─────────────────────────────────────────────");
    println!("   Cash on hand:        {:>14}", format_cents(snapshot.starting_cash));
    println!("   Monthly retainers:   {:>14}", format_cents(snapshot.monthly_retainers));
    println!("   Monthly payroll:     {:>14}", format_cents(snapshot.monthly_payroll));
    println!("   Recurring costs:     {:>14}", format_cents(snapshot.monthly_recurring_costs));
    println!("   Outstanding AR:      {:>14}", format_cents(snapshot.outstanding_ar));
    println!("   Outstanding AP:      {:>14}", format_cents(snapshot.outstanding_ap));
    println!("   Pipeline value:      {:>14}", format_cents(snapshot.pipeline_value));
    println!("   Monthly burn:        {:>14}", format_cents(snapshot.total_burn()));

    if !degraded.is_empty() {
        println!();
        println!("   ⚠️  Unavailable aggregates (zeroed): {}", degraded.join(", "));
    }

    println!();
    Ok(())
}
