//! The session context shared by the gateway and the session store.
//!
//! A [`SessionContext`] is a cheap, cloneable handle. It is passed explicitly
//! to whatever needs the current identity; there is no global session.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};

use super::storage::{Storage, StorageError, AUTH_TOKEN_KEY, USER_KEY};
use crate::models::{Role, User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub user: User,
    pub activated_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(token: String, user: User) -> Self {
        Self {
            token,
            user,
            activated_at: Utc::now(),
        }
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The user asked to log out.
    UserRequested,
    /// The backend answered 401 to some request.
    Unauthorized,
    /// A persisted token failed validation at startup.
    ValidationFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut { reason: Option<LogoutReason> },
    LoggedIn,
}

impl AuthState {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, AuthState::LoggedIn)
    }

    /// True when a front end should send the user to its login entry point
    /// because the backend revoked the session mid-use.
    pub fn needs_login_redirect(&self) -> bool {
        matches!(
            self,
            AuthState::LoggedOut {
                reason: Some(LogoutReason::Unauthorized)
            }
        )
    }
}

struct SessionInner {
    data: RwLock<Option<SessionData>>,
    storage: Arc<dyn Storage>,
    state_tx: watch::Sender<AuthState>,
}

#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

impl SessionContext {
    /// Create an empty (logged out) session backed by `storage`.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (state_tx, _) = watch::channel(AuthState::LoggedOut { reason: None });
        Self {
            inner: Arc::new(SessionInner {
                data: RwLock::new(None),
                storage,
                state_tx,
            }),
        }
    }

    /// Bearer token of the active session. A persisted token that has not
    /// been validated yet is never returned here.
    pub fn token(&self) -> Option<String> {
        self.read(|data| data.map(|d| d.token.clone()))
    }

    pub fn user(&self) -> Option<User> {
        self.read(|data| data.map(|d| d.user.clone()))
    }

    pub fn role(&self) -> Option<Role> {
        self.read(|data| data.map(|d| d.user.role.clone()))
    }

    pub fn data(&self) -> Option<SessionData> {
        self.read(|data| data.cloned())
    }

    pub fn state(&self) -> AuthState {
        *self.inner.state_tx.borrow()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state().is_logged_in()
    }

    /// Watch session transitions. Front ends redirect to login when the
    /// state becomes [`AuthState::needs_login_redirect`].
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state_tx.subscribe()
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.inner.storage
    }

    /// Token persisted by a previous run, if any. Untrusted until validated.
    pub fn stored_token(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .inner
            .storage
            .get(AUTH_TOKEN_KEY)?
            .filter(|t| !t.trim().is_empty()))
    }

    /// Persist the token/profile pair, then make it the active session.
    ///
    /// On a storage failure nothing stays persisted and the session is
    /// left as it was.
    pub fn activate(&self, data: SessionData) -> Result<(), StorageError> {
        self.persist(&data)?;
        let user_id = data.user.id;
        *self.inner.data.write() = Some(data);
        self.inner.state_tx.send_replace(AuthState::LoggedIn);
        info!(user_id, "Session activated");
        Ok(())
    }

    /// Drop the active session and everything persisted for it.
    ///
    /// Storage failures are logged; the in-memory transition always happens.
    pub fn invalidate(&self, reason: LogoutReason) {
        let previous = self.inner.data.write().take();

        for key in [AUTH_TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.inner.storage.remove(key) {
                warn!(key, error = %e, "Failed to clear persisted session key");
            }
        }

        self.inner
            .state_tx
            .send_replace(AuthState::LoggedOut { reason: Some(reason) });
        info!(
            user_id = previous.as_ref().map(|d| d.user.id),
            ?reason,
            "Session cleared"
        );
    }

    fn persist(&self, data: &SessionData) -> Result<(), StorageError> {
        let user = serde_json::to_string(&data.user)?;
        self.inner.storage.set(AUTH_TOKEN_KEY, &data.token)?;
        if let Err(e) = self.inner.storage.set(USER_KEY, &user) {
            if let Err(rollback) = self.inner.storage.remove(AUTH_TOKEN_KEY) {
                warn!(error = %rollback, "Failed to roll back persisted token");
            }
            return Err(e);
        }
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(Option<&SessionData>) -> T) -> T {
        let guard = self.inner.data.read();
        f(guard.as_ref())
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("state", &self.state())
            .field("user_id", &self.read(|d| d.map(|d| d.user.id)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::MemoryStorage;

    /// Memory storage that refuses writes to one key.
    struct RejectingStorage {
        inner: MemoryStorage,
        reject: &'static str,
    }

    impl Storage for RejectingStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == self.reject {
                return Err(std::io::Error::other("disk full").into());
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn sample_user(role: Role) -> User {
        User {
            id: 42,
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            role,
            employee_id: None,
            phone: None,
            hire_date: None,
            is_active_sales: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_starts_logged_out() {
        let session = SessionContext::new(Arc::new(MemoryStorage::new()));
        assert_eq!(session.state(), AuthState::LoggedOut { reason: None });
        assert!(session.token().is_none());
        assert!(!session.state().needs_login_redirect());
    }

    #[test]
    fn test_activate_persists_pair() {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionContext::new(storage.clone());

        session
            .activate(SessionData::new("tok".to_string(), sample_user(Role::Rep)))
            .unwrap();

        assert!(session.is_logged_in());
        assert_eq!(session.token().as_deref(), Some("tok"));
        assert_eq!(storage.len(), 2);
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("tok"));
        let stored: User = serde_json::from_str(&storage.get(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.id, 42);
    }

    #[test]
    fn test_invalidate_clears_everything_and_notifies() {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionContext::new(storage.clone());
        let mut rx = session.subscribe();

        session
            .activate(SessionData::new("tok".to_string(), sample_user(Role::Admin)))
            .unwrap();
        session.invalidate(LogoutReason::Unauthorized);

        assert!(storage.is_empty());
        assert!(session.user().is_none());
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().needs_login_redirect());
    }

    #[test]
    fn test_stored_token_ignores_blank() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(AUTH_TOKEN_KEY, "   ").unwrap();
        let session = SessionContext::new(storage);
        assert_eq!(session.stored_token().unwrap(), None);
        // Persisted tokens are never the active token
        assert!(session.token().is_none());
    }

    #[test]
    fn test_activate_rolls_back_partial_write() {
        let storage = Arc::new(RejectingStorage {
            inner: MemoryStorage::new(),
            reject: USER_KEY,
        });
        let session = SessionContext::new(storage.clone());

        let result = session.activate(SessionData::new("tok".to_string(), sample_user(Role::Rep)));

        assert!(matches!(result, Err(StorageError::Io(_))));
        assert!(!session.is_logged_in());
        assert!(session.token().is_none());
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);
        assert!(storage.inner.is_empty());
    }
}
