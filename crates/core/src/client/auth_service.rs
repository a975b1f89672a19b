//! Sign-in and sign-out for the admin panel

use grabbi_domain::constants::LOGIN_PATH;
use grabbi_domain::{AdminUser, ApiRequest, ErrorOutcome, LoginResponse};
use serde_json::json;
use tracing::{info, instrument, warn};

use super::classifier::{classify_response, classify_transport};
use super::service::AuthenticatedClient;

/// Login/logout on top of an [`AuthenticatedClient`]'s session.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: AuthenticatedClient,
}

impl AuthService {
    pub fn new(client: AuthenticatedClient) -> Self {
        Self { client }
    }

    /// Sign in with email and password.
    ///
    /// The login call bypasses refresh handling: a 401 here means bad
    /// credentials. Only admins may sign in; other roles get `AccessDenied`
    /// and nothing is stored.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminUser, ErrorOutcome> {
        let request = ApiRequest::post(LOGIN_PATH, json!({ "email": email, "password": password }));
        let response =
            self.client.send_direct(&request).await.map_err(|err| classify_transport(&err))?;
        if !response.is_success() {
            return Err(classify_response(&response));
        }

        let login = response.json_value().map(|body| LoginResponse::from_body(&body));
        let Some(LoginResponse { grant, user: Some(user) }) = login else {
            return Err(ErrorOutcome::UnknownError(
                "Failed to parse response: missing user profile".to_string(),
            ));
        };
        if !user.is_admin() {
            warn!(role = %user.role, "Rejected sign-in for non-admin role");
            return Err(ErrorOutcome::AccessDenied);
        }
        let Some(grant) = grant else {
            return Err(ErrorOutcome::UnknownError(
                "Login response did not include a token".to_string(),
            ));
        };

        // Drop any refresh token left over from a previous session.
        let session = self.client.session();
        session.clear_tokens();
        session.set_tokens(&grant.access_token, grant.refresh_token.as_deref());
        self.client.authenticator().set_credential(Some(&grant.access_token));

        info!(user_id = %user.id, has_refresh_token = grant.refresh_token.is_some(), "Signed in");
        Ok(user)
    }

    /// User-initiated sign-out; the logout callback is not fired.
    pub fn logout(&self) {
        self.client.session().clear_tokens();
        self.client.authenticator().set_credential(None);
        info!("Signed out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.session().get_access_token().is_some()
    }

    pub fn client(&self) -> &AuthenticatedClient {
        &self.client
    }
}
