//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init, seed, snapshot) and shared utilities (open_db)
//! - `simulate` - Scenario assembly and simulation output
//! - `serve` - Web server command

pub mod core;
pub mod serve;
pub mod simulate;

// Re-export command functions for main.rs
pub use core::*;
pub use serve::*;
pub use simulate::*;
