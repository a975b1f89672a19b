//! Session store: the persisted token pair plus the logout hook.
//!
//! Every durable operation degrades instead of failing. A missing backend
//! behaves as if both tokens are permanently unset, and backend errors are
//! logged and swallowed.

use std::fmt;
use std::sync::Arc;

use grabbi_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use grabbi_domain::Session;
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::ports::SecretStore;

/// Callback fired when a session cannot be salvaged
pub type LogoutHandler = Arc<dyn Fn() + Send + Sync>;

/// Durable storage for the access and refresh tokens
pub struct SessionStore {
    backend: Option<Arc<dyn SecretStore>>,
    logout_handler: RwLock<Option<LogoutHandler>>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn SecretStore>) -> Self {
        Self { backend: Some(backend), logout_handler: RwLock::new(None) }
    }

    /// A store without durable storage; reads always return `None`.
    pub fn detached() -> Self {
        Self { backend: None, logout_handler: RwLock::new(None) }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.as_deref().map_or("none", |backend| backend.name())
    }

    pub fn get_access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY)
    }

    pub fn get_refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY)
    }

    /// Snapshot of both tokens.
    pub fn session(&self) -> Session {
        Session { access_token: self.get_access_token(), refresh_token: self.get_refresh_token() }
    }

    /// Persist a new access token. A `None` refresh token keeps the stored one.
    pub fn set_tokens(&self, access_token: &str, refresh_token: Option<&str>) {
        self.write(ACCESS_TOKEN_KEY, access_token);
        if let Some(refresh_token) = refresh_token {
            self.write(REFRESH_TOKEN_KEY, refresh_token);
        }
        debug!(
            backend = self.backend_name(),
            has_refresh_token = refresh_token.is_some(),
            "Stored session tokens"
        );
    }

    pub fn clear_tokens(&self) {
        self.delete(ACCESS_TOKEN_KEY);
        self.delete(REFRESH_TOKEN_KEY);
        debug!(backend = self.backend_name(), "Cleared session tokens");
    }

    /// Replace the logout callback.
    pub fn set_logout_handler<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.logout_handler.write() = Some(Arc::new(handler));
    }

    pub fn has_logout_handler(&self) -> bool {
        self.logout_handler.read().is_some()
    }

    /// Invoke the logout callback, if one is registered.
    pub fn notify_logout(&self) {
        // Clone out so the handler runs without the lock held.
        let handler = self.logout_handler.read().clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        let backend = self.backend.as_ref()?;
        match backend.get(key) {
            Ok(value) => value.filter(|value| !value.is_empty()),
            Err(err) => {
                warn!(key, backend = backend.name(), error = %err, "Failed to read session value");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        if let Err(err) = backend.set(key, value) {
            warn!(key, backend = backend.name(), error = %err, "Failed to write session value");
        }
    }

    fn delete(&self, key: &str) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        if let Err(err) = backend.remove(key) {
            warn!(key, backend = backend.name(), error = %err, "Failed to remove session value");
        }
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("backend", &self.backend_name())
            .field("has_logout_handler", &self.has_logout_handler())
            .finish()
    }
}
