//! Configuration management

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_KEYCHAIN_SERVICE, DEFAULT_LOG_LEVEL, DEFAULT_TIMEOUT_SECS,
};
use crate::impl_domain_enum_conversions;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every request path is resolved against (e.g. `https://host/api`)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request transport timeout; also bounds a hung refresh exchange
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), timeout_seconds: DEFAULT_TIMEOUT_SECS }
    }
}

/// Which durable store backs the session tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Keychain,
    File,
    Memory,
    None,
}

impl_domain_enum_conversions!(StorageKind {
    Keychain => "keychain",
    File => "file",
    Memory => "memory",
    None => "none",
});

/// Session storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub kind: StorageKind,
    /// Path of the JSON token file (`kind = "file"` only)
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Keychain service name (`kind = "keychain"` only)
    #[serde(default = "default_keychain_service")]
    pub keychain_service: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::Keychain,
            path: None,
            keychain_service: DEFAULT_KEYCHAIN_SERVICE.to_string(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl_domain_enum_conversions!(LogFormat {
    Text => "text",
    Json => "json",
});

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), format: LogFormat::Text }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_keychain_service() -> String {
    DEFAULT_KEYCHAIN_SERVICE.to_string()
}
