//! Port interfaces for durable session storage
//!
//! The session store keeps exactly two string values; backends only need to
//! provide key-addressed get/set/remove.

use thiserror::Error;

/// Errors raised by a secret store backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing storage is not available in this environment
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backend refused or failed the operation
    #[error("storage access failed: {0}")]
    AccessFailed(String),

    /// Stored data could not be encoded or decoded
    #[error("storage serialization failed: {0}")]
    Serialization(String),
}

/// Durable key-value storage for secrets
///
/// Implementations must make `remove` idempotent: removing a missing key is
/// not an error.
pub trait SecretStore: Send + Sync {
    /// Read a value, `Ok(None)` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Name of this backend, for diagnostics
    fn name(&self) -> &str {
        "unknown"
    }
}

impl<T: SecretStore + ?Sized> SecretStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
    fn name(&self) -> &str {
        (**self).name()
    }
}
