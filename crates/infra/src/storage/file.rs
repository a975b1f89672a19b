//! File-based secret storage with owner-only permissions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use grabbi_core::{SecretStore, StoreError};
use parking_lot::Mutex;
use tracing::debug;

/// JSON map of key → value on disk, written with 0600 permissions on Unix.
///
/// A missing or empty file reads as an empty store.
pub struct FileSecretStore {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| io_error(&self.path, &e))?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn write_all(&self, data: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, &e))?;
        }

        let content = serde_json::to_string_pretty(data)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| io_error(&self.path, &e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms).map_err(|e| io_error(&self.path, &e))?;
        }

        debug!(path = %self.path.display(), entries = data.len(), "Secret file written");
        Ok(())
    }
}

impl SecretStore for FileSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut data = self.read_all()?;
        data.insert(key.to_string(), value.to_string());
        self.write_all(&data)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut data = self.read_all()?;
        if data.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(&data)
    }

    fn name(&self) -> &str {
        "file"
    }
}

fn io_error(path: &Path, err: &std::io::Error) -> StoreError {
    StoreError::AccessFailed(format!("{}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_roundtrip_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = FileSecretStore::new(&path);

        assert_eq!(store.get("admin_token").unwrap(), None);
        store.set("admin_token", "abc").unwrap();
        store.set("admin_refresh_token", "def").unwrap();

        let reopened = FileSecretStore::new(&path);
        assert_eq!(reopened.get("admin_token").unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get("admin_refresh_token").unwrap().as_deref(), Some("def"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileSecretStore::new(dir.path().join("session.json"));

        store.remove("admin_token").unwrap();
        store.set("admin_token", "abc").unwrap();
        store.remove("admin_token").unwrap();
        store.remove("admin_token").unwrap();
        assert_eq!(store.get("admin_token").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = FileSecretStore::new(&path).get("admin_token").unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        FileSecretStore::new(&path).set("admin_token", "abc").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
