//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use oracle_core::TierTable;

use super::open_db;

pub async fn cmd_serve(db_path: &Path, host: &str, port: u16) -> Result<()> {
    println!("🚀 Starting Oracle web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    let db = open_db(db_path)?;
    let tiers = TierTable::from_env().context("Failed to load hiring tier table")?;

    oracle_server::serve(db, tiers, host, port).await
}
