//! Admin client wiring
//!
//! Builds the transport, secret store, session store, authenticated client,
//! and auth service from a [`Config`].

use std::sync::Arc;
use std::time::Duration;

use grabbi_core::{AuthService, AuthenticatedClient, SessionStore};
use grabbi_domain::{Config, Result};
use tracing::info;

use crate::http::HttpClient;
use crate::storage::build_secret_store;

/// Fully wired admin API client.
#[derive(Debug, Clone)]
pub struct AdminClient {
    api: AuthenticatedClient,
    auth: AuthService,
}

impl AdminClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    /// Returns `AdminError::Config` when the storage backend is misconfigured
    /// or the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpClient::builder()
            .timeout(Duration::from_secs(config.api.timeout_seconds))
            .user_agent(concat!("grabbi-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let session = match build_secret_store(&config.storage)? {
            Some(backend) => SessionStore::new(backend),
            None => SessionStore::detached(),
        };

        let api = AuthenticatedClient::new(
            config.api.base_url.clone(),
            Arc::new(transport),
            Arc::new(session),
        );
        let auth = AuthService::new(api.clone());

        info!(
            base_url = %config.api.base_url,
            storage = %config.storage.kind,
            authenticated = auth.is_authenticated(),
            "Admin client ready"
        );

        Ok(Self { api, auth })
    }

    /// Authenticated request path for the resource screens.
    pub fn api(&self) -> &AuthenticatedClient {
        &self.api
    }

    /// Login and logout.
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Register the callback fired when the session cannot be refreshed.
    pub fn set_logout_handler<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.api.set_logout_handler(handler);
    }
}
