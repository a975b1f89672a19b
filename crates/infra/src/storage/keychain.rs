//! Platform keychain secret storage
//!
//! One credential entry per key under a fixed service name, stored in
//! Keychain Access (macOS), Credential Manager (Windows), or the Secret
//! Service API (Linux).

use grabbi_core::{SecretStore, StoreError};
use keyring::Entry;
use tracing::debug;

use crate::errors::IntoStoreError;

/// Keychain-backed secret store
pub struct KeychainSecretStore {
    service_name: String,
}

impl KeychainSecretStore {
    /// Create a store for `service_name` (e.g. "grabbi-admin").
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into() }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    fn entry(&self, key: &str) -> Result<Entry, StoreError> {
        Entry::new(&self.service_name, key).map_err(IntoStoreError::into_store_error)
    }
}

impl SecretStore for KeychainSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        debug!(service = %self.service_name, key = %key, "Reading secret from keychain");

        match self.entry(key)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into_store_error()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        debug!(service = %self.service_name, key = %key, "Storing secret in keychain");

        self.entry(key)?.set_password(value).map_err(IntoStoreError::into_store_error)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        debug!(service = %self.service_name, key = %key, "Deleting secret from keychain");

        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into_store_error()),
        }
    }

    fn name(&self) -> &str {
        "keychain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_is_named_after_service() {
        let store = KeychainSecretStore::new("grabbi-admin.test");
        assert_eq!(store.service_name(), "grabbi-admin.test");
        assert_eq!(store.name(), "keychain");
    }

    // Requires an unlocked platform keychain; run with `--ignored` locally.
    #[test]
    #[ignore]
    fn test_keychain_roundtrip() {
        let service = format!("grabbi-admin.test.{}", uuid::Uuid::new_v4());
        let store = KeychainSecretStore::new(service);

        store.set("admin_token", "abc").unwrap();
        assert_eq!(store.get("admin_token").unwrap().as_deref(), Some("abc"));
        store.remove("admin_token").unwrap();
        store.remove("admin_token").unwrap();
        assert_eq!(store.get("admin_token").unwrap(), None);
    }
}
