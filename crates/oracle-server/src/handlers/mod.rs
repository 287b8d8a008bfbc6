//! HTTP request handlers
//!
//! One submodule per API area.

pub mod oracle;

// Re-export all handlers for use in router
pub use oracle::*;
