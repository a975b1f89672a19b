//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `GRABBI_API_URL` is unset, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. With neither, uses [`Config::default`] (the local development API)
//!
//! ## Environment Variables
//! - `GRABBI_API_URL`: Base URL of the admin API (required for env loading)
//! - `GRABBI_API_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `GRABBI_STORAGE`: Token storage backend (`keychain|file|memory|none`)
//! - `GRABBI_STORAGE_PATH`: Token file path for the `file` backend
//! - `GRABBI_KEYCHAIN_SERVICE`: Keychain service name
//! - `GRABBI_LOG_LEVEL`: Default log filter when `RUST_LOG` is unset
//! - `GRABBI_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./grabbi.json` or `./grabbi.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use grabbi_domain::{
    AdminError, ApiConfig, Config, LogFormat, LoggingConfig, Result, StorageConfig, StorageKind,
};

const CONFIG_FILE_NAMES: [&str; 4] = ["grabbi.json", "grabbi.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the base URL
/// variable is missing or a value is invalid, falls back to a config file.
/// When no file exists either, the defaults apply.
///
/// # Errors
/// Returns `AdminError::Config` if a config file exists but is invalid, or
/// if `GRABBI_API_URL` is set with invalid values and no file is found.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            match probe_config_paths() {
                Some(path) => load_from_file(Some(path)),
                None if std::env::var_os("GRABBI_API_URL").is_some() => Err(e),
                None => {
                    let config = Config::default();
                    tracing::info!(
                        base_url = %config.api.base_url,
                        "No configuration found, using defaults"
                    );
                    Ok(config)
                }
            }
        }
    }
}

/// Load configuration from environment variables
///
/// Only `GRABBI_API_URL` is required; everything else falls back to the
/// defaults of [`Config`].
///
/// # Errors
/// Returns `AdminError::Config` if the base URL is missing or a value is
/// invalid.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("GRABBI_API_URL")?;
    validate_base_url(&base_url)?;

    let defaults = Config::default();

    let timeout_seconds = match std::env::var("GRABBI_API_TIMEOUT_SECS") {
        Ok(value) => value
            .parse::<u64>()
            .map_err(|e| AdminError::Config(format!("Invalid API timeout: {}", e)))?,
        Err(_) => defaults.api.timeout_seconds,
    };

    let kind = match std::env::var("GRABBI_STORAGE") {
        Ok(value) => value
            .parse::<StorageKind>()
            .map_err(|e| AdminError::Config(format!("Invalid storage backend: {}", e)))?,
        Err(_) => defaults.storage.kind,
    };
    let path = std::env::var("GRABBI_STORAGE_PATH").ok().map(PathBuf::from);
    let keychain_service = std::env::var("GRABBI_KEYCHAIN_SERVICE")
        .unwrap_or_else(|_| defaults.storage.keychain_service.clone());

    let level =
        std::env::var("GRABBI_LOG_LEVEL").unwrap_or_else(|_| defaults.logging.level.clone());
    let format = if env_bool("GRABBI_LOG_JSON", false) { LogFormat::Json } else { LogFormat::Text };

    Ok(Config {
        api: ApiConfig { base_url, timeout_seconds },
        storage: StorageConfig { kind, path, keychain_service },
        logging: LoggingConfig { level, format },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `AdminError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The base URL is not a valid http(s) URL
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AdminError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AdminError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AdminError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    validate_base_url(&config.api.base_url)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AdminError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AdminError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(AdminError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn validate_base_url(base_url: &str) -> Result<()> {
    let parsed = url::Url::parse(base_url)
        .map_err(|e| AdminError::Config(format!("Invalid API base URL '{}': {}", base_url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AdminError::Config(format!("Unsupported API URL scheme: {}", other))),
    }
}

/// Get required environment variable
///
/// # Errors
/// Returns `AdminError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| AdminError::Config(format!("Missing required environment variable: {}", key)))
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
