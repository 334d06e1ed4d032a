//! Session lifecycle: restore at startup, login, logout.
//!
//! `LoggedOut -> (restore | login) -> LoggedIn -> (logout | 401) -> LoggedOut`

use tracing::{debug, info, warn};

use super::session::{AuthState, LogoutReason, SessionContext, SessionData};
use super::storage::{AUTH_TOKEN_KEY, USER_KEY};
use super::AuthError;
use crate::api::ApiClient;
use crate::models::LoginCredentials;

pub struct SessionStore {
    api: ApiClient,
    session: SessionContext,
}

impl SessionStore {
    /// The store drives the same session the client's gateway reads from.
    pub fn new(api: ApiClient) -> Self {
        let session = api.gateway().session().clone();
        Self { api, session }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Revalidate a persisted token against `/auth/me/`.
    ///
    /// Single attempt, no retry. Any failure clears the persisted token and
    /// profile and leaves the session logged out.
    pub async fn restore(&self) -> AuthState {
        if self.session.is_logged_in() {
            return self.session.state();
        }

        let token = match self.session.stored_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No stored session token");
                // A blank token or a profile without a token is left over
                // from an interrupted run
                for key in [AUTH_TOKEN_KEY, USER_KEY] {
                    if let Err(e) = self.session.storage().remove(key) {
                        debug!(key, error = %e, "Failed to remove orphaned session key");
                    }
                }
                return self.session.state();
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored session");
                self.session.invalidate(LogoutReason::ValidationFailed);
                return self.session.state();
            }
        };

        match self.api.current_user_with_token(&token).await {
            Ok(user) => {
                if let Err(e) = self.session.activate(SessionData::new(token, user)) {
                    warn!(error = %e, "Failed to persist restored session");
                    self.session.invalidate(LogoutReason::ValidationFailed);
                }
            }
            Err(e) => {
                info!(error = %e, "Stored session token rejected");
                self.session.invalidate(LogoutReason::ValidationFailed);
            }
        }
        self.session.state()
    }

    /// Exchange credentials for a token and activate the session.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<SessionData, AuthError> {
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let response = self
            .api
            .login(credentials)
            .await
            .map_err(AuthError::LoginFailed)?;

        let data = SessionData::new(response.token, response.user);
        self.session.activate(data.clone())?;
        info!(username = %credentials.username, "Login successful");
        Ok(data)
    }

    /// Best-effort remote logout; the local session is cleared regardless.
    pub async fn logout(&self) {
        if self.session.token().is_some() {
            if let Err(e) = self.api.logout().await {
                warn!(error = %e, "Remote logout failed, clearing local session anyway");
            }
        }
        self.session.invalidate(LogoutReason::UserRequested);
    }
}
