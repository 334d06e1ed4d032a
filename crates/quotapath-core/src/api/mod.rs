//! REST API layer for the QuotaPath backend.
//!
//! All traffic goes through the [`Gateway`], which attaches the session
//! token and ends the session on a 401. [`ApiClient`] wraps the gateway with
//! one typed method per backend endpoint.

pub mod client;
pub mod error;
pub mod gateway;

pub use client::{ApiClient, CommissionsOverview};
pub use error::ApiError;
pub use gateway::{AuthHeader, Gateway, Middleware, RequestContext, UnauthorizedGuard};
