//! Secret store backends for the session tokens

pub mod file;
pub mod keychain;

use std::sync::Arc;

use grabbi_core::SecretStore;
use grabbi_domain::{AdminError, Result, StorageConfig, StorageKind};

pub use file::FileSecretStore;
pub use grabbi_core::MemorySecretStore;
pub use keychain::KeychainSecretStore;

/// Build the backend selected by `config`.
///
/// Returns `Ok(None)` for `StorageKind::None`: the session then runs without
/// durable storage.
///
/// # Errors
/// Returns `AdminError::Config` when `kind = "file"` has no `path`.
pub fn build_secret_store(config: &StorageConfig) -> Result<Option<Arc<dyn SecretStore>>> {
    let store: Arc<dyn SecretStore> = match config.kind {
        StorageKind::Keychain => Arc::new(KeychainSecretStore::new(&config.keychain_service)),
        StorageKind::File => {
            let path = config.path.clone().ok_or_else(|| {
                AdminError::Config("storage.path is required for file storage".to_string())
            })?;
            Arc::new(FileSecretStore::new(path))
        }
        StorageKind::Memory => Arc::new(MemorySecretStore::new()),
        StorageKind::None => return Ok(None),
    };
    Ok(Some(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_selects_backend() {
        let memory = StorageConfig { kind: StorageKind::Memory, ..StorageConfig::default() };
        assert_eq!(build_secret_store(&memory).unwrap().unwrap().name(), "memory");

        let keychain = StorageConfig::default();
        assert_eq!(build_secret_store(&keychain).unwrap().unwrap().name(), "keychain");

        let none = StorageConfig { kind: StorageKind::None, ..StorageConfig::default() };
        assert!(build_secret_store(&none).unwrap().is_none());
    }

    #[test]
    fn test_file_backend_requires_path() {
        let config = StorageConfig { kind: StorageKind::File, ..StorageConfig::default() };
        assert!(matches!(build_secret_store(&config), Err(AdminError::Config(_))));

        let config = StorageConfig {
            kind: StorageKind::File,
            path: Some("/tmp/grabbi/session.json".into()),
            ..StorageConfig::default()
        };
        assert_eq!(build_secret_store(&config).unwrap().unwrap().name(), "file");
    }
}
