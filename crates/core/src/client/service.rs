//! Authenticated client - the request path with transparent token refresh

use std::sync::Arc;

use grabbi_domain::constants::{bearer, AUTHORIZATION_HEADER, REFRESH_PATH};
use grabbi_domain::{
    ApiRequest, ApiResponse, ErrorOutcome, RefreshGrant, TransportError, TransportRequest,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use super::authenticator::Authenticator;
use super::classifier::classify;
use super::coordinator::{CycleGuard, CycleOutcome, RefreshCoordinator, RefreshPhase, Ticket};
use super::ports::Transport;
use crate::session::SessionStore;

/// Why a refresh cycle could not produce a new token.
///
/// Callers only ever see `SessionExpired`; the reason is a log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshFailure {
    NoRefreshToken,
    ExchangeFailed,
    RejectedStatus(u16),
    MissingAccessToken,
}

impl RefreshFailure {
    fn as_str(&self) -> &'static str {
        match self {
            Self::NoRefreshToken => "no_refresh_token",
            Self::ExchangeFailed => "exchange_failed",
            Self::RejectedStatus(_) => "rejected_status",
            Self::MissingAccessToken => "missing_access_token",
        }
    }

    /// Status of a rejected exchange.
    fn status(&self) -> Option<u16> {
        match self {
            Self::RejectedStatus(status) => Some(*status),
            _ => None,
        }
    }
}

/// HTTP client that attaches the session credential and recovers from
/// expired access tokens.
///
/// Cloning is cheap and clones share the same session and refresh state.
/// Separately constructed clients never interact.
#[derive(Clone)]
pub struct AuthenticatedClient {
    base_url: Arc<str>,
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
    authenticator: Arc<Authenticator>,
    coordinator: Arc<RefreshCoordinator>,
}

impl AuthenticatedClient {
    /// Build a client; the default credential is read from `session`.
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        session: Arc<SessionStore>,
    ) -> Self {
        let base_url: String = base_url.into();
        let authenticator = Authenticator::from_store(&session);
        Self {
            base_url: Arc::from(base_url),
            transport,
            session,
            authenticator: Arc::new(authenticator),
            coordinator: Arc::new(RefreshCoordinator::new()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn refresh_phase(&self) -> RefreshPhase {
        self.coordinator.phase()
    }

    /// Requests currently suspended behind a refresh.
    pub fn queued_waiters(&self) -> usize {
        self.coordinator.queued_waiters()
    }

    /// Register the callback fired when a refresh fails.
    pub fn set_logout_handler<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.session.set_logout_handler(handler);
    }

    /// Send a request with the session credential.
    ///
    /// A 401 triggers at most one refresh for this request; every other
    /// failure is classified and returned unchanged.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn request(&self, mut request: ApiRequest) -> Result<ApiResponse, ErrorOutcome> {
        // Read before the credential so a refresh that lands in between
        // counts as newer than this request.
        let observed_generation = self.coordinator.generation();
        self.authenticator.apply(&mut request);

        match self.send_direct(&request).await {
            Ok(response) if response.status == 401 => {
                self.recover(request, observed_generation).await
            }
            result => settle(result),
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ErrorOutcome> {
        let response = self.request(ApiRequest::get(path)).await?;
        decode(&response)
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ErrorOutcome>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(ApiRequest::post(path, encode(body)?)).await?;
        decode(&response)
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ErrorOutcome>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(ApiRequest::put(path, encode(body)?)).await?;
        decode(&response)
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ErrorOutcome> {
        let response = self.request(ApiRequest::delete(path)).await?;
        decode(&response)
    }

    /// Send through the transport without authentication handling.
    pub(crate) async fn send_direct(
        &self,
        request: &ApiRequest,
    ) -> Result<ApiResponse, TransportError> {
        self.transport.send(TransportRequest::resolve(&self.base_url, request)).await
    }

    async fn recover(
        &self,
        request: ApiRequest,
        observed_generation: u64,
    ) -> Result<ApiResponse, ErrorOutcome> {
        match self.coordinator.begin(observed_generation) {
            Ticket::Lead(guard) => self.lead(guard, request).await,
            Ticket::Wait(receiver) => match receiver.await {
                Ok(Ok(token)) => self.retry(request, &token).await,
                Ok(Err(outcome)) => Err(outcome),
                Err(_) => Err(ErrorOutcome::SessionExpired),
            },
            Ticket::Superseded(CycleOutcome::Refreshed) => match self.authenticator.credential() {
                Some(token) => self.retry(request, &token).await,
                None => Err(ErrorOutcome::SessionExpired),
            },
            Ticket::Superseded(CycleOutcome::Expired) => Err(ErrorOutcome::SessionExpired),
        }
    }

    async fn lead(
        &self,
        guard: CycleGuard<'_>,
        request: ApiRequest,
    ) -> Result<ApiResponse, ErrorOutcome> {
        info!("Access token rejected, refreshing session");

        match self.exchange().await {
            Ok(grant) => {
                self.session.set_tokens(&grant.access_token, grant.refresh_token.as_deref());
                self.authenticator.set_credential(Some(&grant.access_token));
                let released = guard.succeed(&grant.access_token);
                info!(
                    released,
                    rotated_refresh_token = grant.refresh_token.is_some(),
                    "Session refreshed"
                );
                self.retry(request, &grant.access_token).await
            }
            Err(failure) => {
                let status = failure.status();
                warn!(reason = failure.as_str(), status, "Session refresh failed");
                self.session.clear_tokens();
                self.authenticator.set_credential(None);
                let rejected = guard.fail();
                info!(rejected, "Session expired, logging out");
                self.session.notify_logout();
                Err(ErrorOutcome::SessionExpired)
            }
        }
    }

    /// Exchange the stored refresh token for a new grant.
    async fn exchange(&self) -> Result<RefreshGrant, RefreshFailure> {
        let refresh_token =
            self.session.get_refresh_token().ok_or(RefreshFailure::NoRefreshToken)?;
        let request = ApiRequest::post(REFRESH_PATH, json!({ "refresh_token": refresh_token }));

        let response = self.send_direct(&request).await.map_err(|err| {
            debug!(kind = ?err.kind, error = %err, "Refresh request failed");
            RefreshFailure::ExchangeFailed
        })?;
        if !response.is_success() {
            return Err(RefreshFailure::RejectedStatus(response.status));
        }

        response
            .json_value()
            .as_ref()
            .and_then(RefreshGrant::from_body)
            .ok_or(RefreshFailure::MissingAccessToken)
    }

    async fn retry(
        &self,
        mut request: ApiRequest,
        token: &str,
    ) -> Result<ApiResponse, ErrorOutcome> {
        request.set_header(AUTHORIZATION_HEADER, bearer(token));

        match self.send_direct(&request).await {
            Ok(response) if response.status == 401 => {
                warn!("Request rejected again after token refresh");
                Err(ErrorOutcome::SessionExpired)
            }
            result => settle(result),
        }
    }
}

impl std::fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .field("phase", &self.coordinator.phase())
            .finish()
    }
}

fn settle(result: Result<ApiResponse, TransportError>) -> Result<ApiResponse, ErrorOutcome> {
    match result {
        Ok(response) if response.is_success() => Ok(response),
        other => {
            let outcome = classify(&other);
            debug!(outcome = outcome.label(), "Request failed");
            Err(outcome)
        }
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ErrorOutcome> {
    serde_json::to_value(body)
        .map_err(|err| ErrorOutcome::UnknownError(format!("Failed to serialize request: {err}")))
}

fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ErrorOutcome> {
    response
        .json()
        .map_err(|err| ErrorOutcome::UnknownError(format!("Failed to parse response: {err}")))
}
