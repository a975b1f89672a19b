//! Conversions from external infrastructure errors into domain errors.

use grabbi_core::StoreError;
use grabbi_domain::{AdminError, TransportError, TransportErrorKind};
use keyring::Error as KeyringError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AdminError);

impl From<InfraError> for AdminError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AdminError> for InfraError {
    fn from(value: AdminError) -> Self {
        InfraError(value)
    }
}

/// Maps a failed send to the transport-level error the core understands.
pub trait IntoTransportError {
    fn into_transport_error(self) -> TransportError;
}

/// Maps a backend failure to the secret-store port error.
pub trait IntoStoreError {
    fn into_store_error(self) -> StoreError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TransportError / AdminError */
/* -------------------------------------------------------------------------- */

impl IntoTransportError for HttpError {
    fn into_transport_error(self) -> TransportError {
        if self.is_timeout() {
            return TransportError::timeout(format!("HTTP request timed out: {self}"));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return TransportError::connect(format!("HTTP connection failure: {self}"));
        }

        if self.is_request() || self.is_body() || self.is_builder() {
            return TransportError::new(TransportErrorKind::Request, self.to_string());
        }

        TransportError::new(TransportErrorKind::Other, self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        if value.is_builder() {
            return InfraError(AdminError::Config(format!("invalid HTTP client setup: {value}")));
        }
        InfraError(AdminError::Network(value.into_transport_error().message))
    }
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → StoreError */
/* -------------------------------------------------------------------------- */

impl IntoStoreError for KeyringError {
    fn into_store_error(self) -> StoreError {
        use KeyringError::*;

        let description = self.to_string();

        match self {
            BadEncoding(_) => {
                StoreError::Serialization("credential in keychain is not valid UTF-8".into())
            }
            TooLong(name, limit) => StoreError::AccessFailed(format!(
                "keychain attribute '{name}' exceeds platform limit ({limit})"
            )),
            Invalid(attr, reason) => {
                let message = format!("keychain attribute '{attr}' is invalid: {reason}");
                StoreError::AccessFailed(message)
            }
            Ambiguous(entries) => StoreError::AccessFailed(format!(
                "multiple keychain entries matched request ({} results)",
                entries.len()
            )),
            PlatformFailure(err) => {
                StoreError::Unavailable(format!("keychain platform error: {err}"))
            }
            NoStorageAccess(err) => {
                StoreError::Unavailable(format!("unable to access secure storage: {err}"))
            }
            _ => StoreError::AccessFailed(description),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* StoreError → AdminError */
/* -------------------------------------------------------------------------- */

impl From<StoreError> for InfraError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Unavailable(message) => InfraError(AdminError::Security(message)),
            other => InfraError(AdminError::Storage(other.to_string())),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(AdminError::Storage(value.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
