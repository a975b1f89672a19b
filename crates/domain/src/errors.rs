//! Error types used throughout the client

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    MSG_ACCESS_DENIED, MSG_NETWORK_ERROR, MSG_NOT_FOUND, MSG_SERVER_ERROR, MSG_SESSION_EXPIRED,
    MSG_UNEXPECTED,
};

/// Plumbing error for configuration, storage, and wiring failures
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AdminError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Security error: {0}")]
    Security(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Result type alias for plumbing operations
pub type Result<T> = std::result::Result<T, AdminError>;

/// Classified outcome of a failed API call.
///
/// This is the only error type callers of the authenticated client ever see.
/// The `Display` text is the message shown to staff.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ErrorOutcome {
    #[error("{}", MSG_SESSION_EXPIRED)]
    SessionExpired,

    #[error("{}", MSG_ACCESS_DENIED)]
    AccessDenied,

    #[error("{}", MSG_NOT_FOUND)]
    NotFound,

    #[error("{}", MSG_SERVER_ERROR)]
    ServerError,

    #[error("{}", MSG_NETWORK_ERROR)]
    NetworkError,

    #[error("{0}")]
    ValidationError(String),

    #[error("{}", unknown_message(.0))]
    UnknownError(String),
}

impl ErrorOutcome {
    /// Stable label for logging fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SessionExpired => "session_expired",
            Self::AccessDenied => "access_denied",
            Self::NotFound => "not_found",
            Self::ServerError => "server_error",
            Self::NetworkError => "network_error",
            Self::ValidationError(_) => "validation_error",
            Self::UnknownError(_) => "unknown_error",
        }
    }

    /// Whether the caller has to sign in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

fn unknown_message(message: &str) -> &str {
    if message.trim().is_empty() {
        MSG_UNEXPECTED
    } else {
        message
    }
}
