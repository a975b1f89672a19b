//! In-memory secret store, used in tests and for `storage.kind = "memory"`.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::ports::{SecretStore, StoreError};

/// Process-local secret store; contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a store, e.g. with a token pair for a test.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { entries: RwLock::new(entries) }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
