//! # Grabbi Domain
//!
//! Domain types for the Grabbi admin API client.
//!
//! This crate contains:
//! - Session and token types (access/refresh pair, refresh grants)
//! - HTTP request/response values shared by every transport
//! - Error types: `AdminError` for plumbing, `ErrorOutcome` for callers
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other Grabbi crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
