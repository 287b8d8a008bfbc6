//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Oracle - Predictive simulation engine for the agency
#[derive(Parser)]
#[command(name = "oracle")]
#[command(about = "What-if simulation over the agency's financial records", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "oracle.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Insert demo agency records
    Seed,

    /// Print the current financial snapshot
    Snapshot,

    /// Run one scenario simulation
    Simulate {
        /// Scenario JSON file; individual flags override its fields
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Client churn rate, percent per month (0-100)
        #[arg(long)]
        churn: Option<f64>,

        /// New client growth, percent per year (0-100)
        #[arg(long)]
        growth: Option<f64>,

        /// Market condition: boom, stable, recession
        #[arg(long)]
        market: Option<String>,

        /// Multiplier applied to recurring operating costs
        #[arg(long)]
        expense_multiplier: Option<f64>,

        /// Planned hires as TIER=COUNT (repeatable, e.g. --hire senior=2)
        #[arg(long = "hire", value_name = "TIER=COUNT")]
        hires: Vec<String>,

        /// Print the raw report as JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}
