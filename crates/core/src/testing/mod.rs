//! Test doubles for the core ports
//!
//! Enabled for this crate's own tests and for downstream crates through the
//! `test-utils` feature.

pub mod mocks;

pub use mocks::{json_response, FailingSecretStore, Gate, RecordingLogout, ScriptedTransport};
