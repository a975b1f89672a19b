//! Client constants
//!
//! Storage keys, endpoint paths, and the fixed user-facing messages.

// Durable storage keys
pub const ACCESS_TOKEN_KEY: &str = "admin_token";
pub const REFRESH_TOKEN_KEY: &str = "admin_refresh_token";

// Endpoints (relative to the base URL)
pub const REFRESH_PATH: &str = "/auth/refresh";
pub const LOGIN_PATH: &str = "/auth/login";

// Defaults
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "grabbi-admin";
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Header handling
pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

// Messages surfaced to callers
pub const MSG_SESSION_EXPIRED: &str = "Session expired. Please login again.";
pub const MSG_ACCESS_DENIED: &str =
    "Access denied. You do not have permission to perform this action.";
pub const MSG_NOT_FOUND: &str = "Resource not found.";
pub const MSG_SERVER_ERROR: &str = "Server error. Please try again later.";
pub const MSG_NETWORK_ERROR: &str = "Network error. Please check your connection and try again.";
pub const MSG_UNEXPECTED: &str = "An unexpected error occurred.";

/// Format a bearer credential for the `Authorization` header.
pub fn bearer(token: &str) -> String {
    format!("{BEARER_PREFIX}{token}")
}
