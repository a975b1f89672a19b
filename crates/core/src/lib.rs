//! # Grabbi Core
//!
//! Session lifecycle logic for the admin API client - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - Port interfaces (`Transport`, `SecretStore`)
//! - The session store and the request authenticator
//! - Response classification into `ErrorOutcome`
//! - The refresh coordinator (single-flight token refresh with a FIFO queue)
//! - The authenticated client and the login/logout service
//!
//! ## Architecture Principles
//! - Only depends on `grabbi-domain`
//! - No reqwest, keychain, or filesystem code
//! - All external dependencies via traits
//! - One client instance owns its refresh state; nothing is global

pub mod client;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export specific items to avoid ambiguity
pub use client::ports::Transport;
pub use client::{
    classify_response, classify_transport, AuthService, AuthenticatedClient, Authenticator,
    RefreshCoordinator, RefreshPhase,
};
pub use session::ports::{SecretStore, StoreError};
pub use session::{LogoutHandler, MemorySecretStore, SessionStore};
