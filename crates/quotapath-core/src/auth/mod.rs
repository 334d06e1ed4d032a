//! Authentication: the session context and its lifecycle.
//!
//! This module provides:
//! - `SessionContext`: the current token and profile, shared explicitly
//! - `SessionStore`: `restore`, `login` and `logout` transitions
//! - `Storage`: durable key-value backends for the persisted session
//!
//! Persisted tokens are revalidated at startup before they are trusted.

pub mod error;
pub mod session;
pub mod storage;
pub mod store;

pub use error::AuthError;
pub use session::{AuthState, LogoutReason, SessionContext, SessionData};
pub use storage::{FileStorage, KeyringStorage, MemoryStorage, Storage, StorageError};
pub use store::SessionStore;
