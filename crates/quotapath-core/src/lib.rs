//! Core library for the QuotaPath sales commission client.
//!
//! - [`api`]: the request gateway and the typed REST client
//! - [`auth`]: session context, session store and persistent storage
//! - [`models`]: users, deals, quotas, compensation plans, commissions
//! - [`nav`]: role-based navigation allow-list
//! - [`config`]: on-disk configuration with environment overrides
//! - [`utils`]: currency, percentage and date formatting

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod nav;
pub mod utils;

pub use api::{ApiClient, ApiError, Gateway};
pub use auth::{AuthError, AuthState, LogoutReason, SessionContext, SessionData, SessionStore};
pub use config::{Config, StorageBackend};
