//! # Grabbi Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The reqwest-backed HTTP transport
//! - Secret store backends (platform keychain, JSON file, memory)
//! - Configuration loading and tracing initialisation
//! - The `AdminClient` factory that wires everything from a `Config`
//!
//! ## Architecture
//! - Implements traits defined in `grabbi-core`
//! - Contains all "impure" code (network, filesystem, keychain)

pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod storage;

// Re-export commonly used items
pub use client::AdminClient;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::init_tracing;
pub use storage::{build_secret_store, FileSecretStore, KeychainSecretStore, MemorySecretStore};
