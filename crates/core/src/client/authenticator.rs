//! Default bearer credential for outgoing requests

use grabbi_domain::constants::{bearer, AUTHORIZATION_HEADER};
use grabbi_domain::ApiRequest;
use parking_lot::RwLock;

use crate::session::SessionStore;

/// Holds the client-level `Authorization` default.
#[derive(Debug, Default)]
pub struct Authenticator {
    credential: RwLock<Option<String>>,
}

impl Authenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the credential from the persisted access token.
    ///
    /// Never fails: an unavailable store reads as "no token".
    pub fn from_store(store: &SessionStore) -> Self {
        let authenticator = Self::new();
        authenticator.set_credential(store.get_access_token().as_deref());
        authenticator
    }

    pub fn set_credential(&self, token: Option<&str>) {
        *self.credential.write() = token.filter(|token| !token.is_empty()).map(str::to_string);
    }

    pub fn credential(&self) -> Option<String> {
        self.credential.read().clone()
    }

    pub fn has_credential(&self) -> bool {
        self.credential.read().is_some()
    }

    /// Attach the default credential unless the request already carries one.
    pub fn apply(&self, request: &mut ApiRequest) {
        if request.authorization().is_some() {
            return;
        }
        if let Some(token) = self.credential.read().as_deref() {
            request.set_header(AUTHORIZATION_HEADER, bearer(token));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::session::MemorySecretStore;

    #[test]
    fn test_apply_adds_bearer_header() {
        let authenticator = Authenticator::new();
        authenticator.set_credential(Some("abc"));

        let mut request = ApiRequest::get("/admin/products");
        authenticator.apply(&mut request);
        assert_eq!(request.authorization(), Some("Bearer abc"));
    }

    #[test]
    fn test_apply_keeps_explicit_header() {
        let authenticator = Authenticator::new();
        authenticator.set_credential(Some("default"));

        let mut request = ApiRequest::get("/orders").with_header("Authorization", "Bearer retry");
        authenticator.apply(&mut request);
        assert_eq!(request.authorization(), Some("Bearer retry"));
    }

    #[test]
    fn test_cleared_credential_sends_no_header() {
        let authenticator = Authenticator::new();
        authenticator.set_credential(Some("abc"));
        authenticator.set_credential(None);

        let mut request = ApiRequest::get("/orders");
        authenticator.apply(&mut request);
        assert_eq!(request.authorization(), None);
        assert!(!authenticator.has_credential());
    }

    #[test]
    fn test_from_store_reads_persisted_token() {
        let store = SessionStore::new(Arc::new(MemorySecretStore::new()));
        store.set_tokens("persisted", None);
        assert_eq!(Authenticator::from_store(&store).credential().as_deref(), Some("persisted"));

        assert_eq!(Authenticator::from_store(&SessionStore::detached()).credential(), None);
    }
}
