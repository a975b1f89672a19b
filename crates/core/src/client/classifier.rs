//! Failed exchange → `ErrorOutcome`
//!
//! Precedence, first match wins: no response, 403, 404, 5xx, a structured
//! `error` message, then the generic status message.

use grabbi_domain::{ApiResponse, ErrorOutcome, TransportError};

/// Classify a received, non-successful response.
pub fn classify_response(response: &ApiResponse) -> ErrorOutcome {
    match response.status {
        403 => ErrorOutcome::AccessDenied,
        404 => ErrorOutcome::NotFound,
        status if status >= 500 => ErrorOutcome::ServerError,
        status => match response.error_message() {
            Some(message) => ErrorOutcome::ValidationError(message),
            None => ErrorOutcome::UnknownError(format!("Request failed with status code {status}")),
        },
    }
}

/// Classify a request that never received a response.
pub fn classify_transport(_error: &TransportError) -> ErrorOutcome {
    ErrorOutcome::NetworkError
}

/// Classify any failed exchange.
pub fn classify(result: &Result<ApiResponse, TransportError>) -> ErrorOutcome {
    match result {
        Ok(response) => classify_response(response),
        Err(error) => classify_transport(error),
    }
}
