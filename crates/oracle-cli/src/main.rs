//! Oracle CLI - Agency what-if simulation
//!
//! Usage:
//!   oracle init               Initialize database
//!   oracle seed               Insert demo agency records
//!   oracle snapshot           Print the current financial snapshot
//!   oracle simulate --churn 15 --hire senior=2
//!   oracle serve --port 3000  Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
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

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Seed => commands::cmd_seed(&cli.db),
        Commands::Snapshot => commands::cmd_snapshot(&cli.db),
        Commands::Simulate {
            scenario,
            churn,
            growth,
            market,
            expense_multiplier,
            hires,
            json,
        } => {
            let db = commands::open_db(&cli.db)?;
            let scenario = commands::build_scenario(
                scenario.as_deref(),
                churn,
                growth,
                market.as_deref(),
                expense_multiplier,
                &hires,
            )?;
            commands::cmd_simulate(&db, &scenario, json)
        }
        Commands::Serve { port, host } => commands::cmd_serve(&cli.db, &host, port).await,
    }
}
