//! Session tokens and refresh grants

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Persisted authentication state.
///
/// Both fields are `None` once the session has been lost or the user logged
/// out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Session {
    /// Whether an access token is present.
    pub fn is_active(&self) -> bool {
        self.access_token.is_some()
    }

    /// Whether a refresh cycle can be attempted.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }
}

/// Tokens issued by the refresh (or login) endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl RefreshGrant {
    /// Extract a grant from an endpoint response body.
    ///
    /// The bearer token is read from `token`, then `access_token`; the first
    /// non-empty string wins. An empty or missing `refresh_token` means the
    /// stored one stays in place. Returns `None` when no usable access token
    /// exists.
    pub fn from_body(body: &Value) -> Option<Self> {
        let access_token =
            non_empty_str(body, "token").or_else(|| non_empty_str(body, "access_token"))?;
        let refresh_token = non_empty_str(body, "refresh_token");

        Some(Self {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.map(str::to_string),
        })
    }
}

fn non_empty_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field).and_then(Value::as_str).filter(|value| !value.is_empty())
}
