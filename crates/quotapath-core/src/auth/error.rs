use thiserror::Error;

use super::storage::StorageError;
use crate::api::ApiError;

/// Why a login attempt failed. Callers show [`AuthError::user_message`] on
/// the login form; the session is left logged out in every case.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Username and password are required")]
    MissingCredentials,

    #[error("Login failed: {0}")]
    LoginFailed(#[source] ApiError),

    #[error("Could not save session: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            AuthError::MissingCredentials => self.to_string(),
            AuthError::LoginFailed(ApiError::BadRequest { message, .. }) => message.clone(),
            AuthError::LoginFailed(ApiError::Unauthorized) => {
                "Invalid username or password".to_string()
            }
            AuthError::LoginFailed(e) => e.user_message(),
            AuthError::Storage(_) => {
                "Login did not complete: the session could not be saved.".to_string()
            }
        }
    }
}
