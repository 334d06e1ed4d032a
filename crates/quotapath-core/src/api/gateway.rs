//! The single chokepoint for backend requests.
//!
//! Every request runs through an ordered [`Middleware`] pipeline. The
//! default pipeline attaches the session token ([`AuthHeader`]) and ends the
//! session on any 401 ([`UnauthorizedGuard`]).

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::ApiError;
use crate::auth::{LogoutReason, SessionContext};
use crate::config::Config;

/// What a middleware knows about the request in flight.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    /// Token to authenticate with: the caller's explicit token, or else the
    /// active session token.
    pub token: Option<String>,
}

/// A step in the request pipeline.
///
/// Request hooks run in registration order. Response hooks also run in
/// registration order, and the first error is returned to the caller in
/// place of any status mapping the gateway would do.
pub trait Middleware: Send + Sync {
    fn on_request(
        &self,
        request: RequestBuilder,
        _ctx: &RequestContext,
    ) -> Result<RequestBuilder, ApiError> {
        Ok(request)
    }

    fn on_response(&self, _status: StatusCode, _ctx: &RequestContext) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Adds `Authorization: <scheme> <token>` when there is a token.
pub struct AuthHeader {
    scheme: String,
}

impl AuthHeader {
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
        }
    }
}

impl Middleware for AuthHeader {
    fn on_request(
        &self,
        request: RequestBuilder,
        ctx: &RequestContext,
    ) -> Result<RequestBuilder, ApiError> {
        let Some(ref token) = ctx.token else {
            return Ok(request);
        };
        let mut value = header::HeaderValue::from_str(&format!("{} {}", self.scheme, token))?;
        value.set_sensitive(true);
        Ok(request.header(header::AUTHORIZATION, value))
    }
}

/// Ends the session on any 401, whichever request triggered it.
pub struct UnauthorizedGuard {
    session: SessionContext,
}

impl UnauthorizedGuard {
    pub fn new(session: SessionContext) -> Self {
        Self { session }
    }
}

impl Middleware for UnauthorizedGuard {
    fn on_response(&self, status: StatusCode, ctx: &RequestContext) -> Result<(), ApiError> {
        if status == StatusCode::UNAUTHORIZED {
            warn!(method = %ctx.method, path = %ctx.path, "Received 401, ending session");
            self.session.invalidate(LogoutReason::Unauthorized);
            return Err(ApiError::Unauthorized);
        }
        Ok(())
    }
}

/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
    session: SessionContext,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl Gateway {
    /// Build a gateway with the default pipeline: [`AuthHeader`] then
    /// [`UnauthorizedGuard`].
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        auth_scheme: &str,
        session: SessionContext,
    ) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self::bare(client, base_url, session.clone())
            .with_middleware(AuthHeader::new(auth_scheme))
            .with_middleware(UnauthorizedGuard::new(session)))
    }

    pub fn from_config(config: &Config, session: SessionContext) -> Result<Self, ApiError> {
        Self::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
            &config.auth_scheme,
            session,
        )
    }

    /// A gateway with an empty pipeline.
    pub fn bare(client: Client, base_url: impl Into<String>, session: SessionContext) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            session,
            middleware: Vec::new(),
        }
    }

    pub fn with_middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join `path` onto the base URL with exactly one slash between them.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Run one request through the pipeline.
    ///
    /// `token` overrides the session token for this request only.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response, ApiError> {
        let ctx = RequestContext {
            method: method.clone(),
            path: path.to_string(),
            token: token.map(str::to_string).or_else(|| self.session.token()),
        };

        let mut request = build(self.client.request(method, self.url(path)));
        for middleware in &self.middleware {
            request = middleware.on_request(request, &ctx)?;
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(method = %ctx.method, path = %ctx.path, status = status.as_u16(), "API response");

        for middleware in &self.middleware {
            middleware.on_response(status, &ctx)?;
        }

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", path, e)))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, None, |r| r).await?;
        Self::decode(path, response).await
    }

    /// GET authenticated with `token` instead of the session token.
    pub async fn get_with_token<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, Some(token), |r| r).await?;
        Self::decode(path, response).await
    }

    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, None, |r| r.query(query)).await?;
        Self::decode(path, response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::POST, path, None, |r| r.json(body)).await?;
        Self::decode(path, response).await
    }

    /// POST with no request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::POST, path, None, |r| r).await?;
        Self::decode(path, response).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::PATCH, path, None, |r| r.json(body)).await?;
        Self::decode(path, response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, None, |r| r).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::MemoryStorage;

    fn gateway(base: &str) -> Gateway {
        let session = SessionContext::new(Arc::new(MemoryStorage::new()));
        Gateway::bare(Client::new(), base, session)
    }

    #[test]
    fn test_url_join() {
        assert_eq!(gateway("http://h/api").url("/auth/me/"), "http://h/api/auth/me/");
        assert_eq!(gateway("http://h/api/").url("auth/me/"), "http://h/api/auth/me/");
        assert_eq!(gateway("http://h/api/").url("/sales/deals/"), "http://h/api/sales/deals/");
    }

    #[test]
    fn test_auth_header_uses_scheme() {
        let client = Client::new();
        let ctx = RequestContext {
            method: Method::GET,
            path: "/auth/me/".to_string(),
            token: Some("abc".to_string()),
        };
        let request = AuthHeader::new("Token")
            .on_request(client.get("http://localhost/auth/me/"), &ctx)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.headers()[header::AUTHORIZATION], "Token abc");

        let anonymous = RequestContext { token: None, ..ctx };
        let request = AuthHeader::new("Token")
            .on_request(client.get("http://localhost/auth/me/"), &anonymous)
            .unwrap()
            .build()
            .unwrap();
        assert!(request.headers().get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_auth_header_rejects_control_characters() {
        let ctx = RequestContext {
            method: Method::GET,
            path: "/".to_string(),
            token: Some("bad\ntoken".to_string()),
        };
        let result = AuthHeader::new("Token").on_request(Client::new().get("http://localhost/"), &ctx);
        assert!(matches!(result, Err(ApiError::InvalidHeader(_))));
    }

    #[test]
    fn test_unauthorized_guard_only_fires_on_401() {
        let session = SessionContext::new(Arc::new(MemoryStorage::new()));
        let guard = UnauthorizedGuard::new(session.clone());
        let ctx = RequestContext {
            method: Method::GET,
            path: "/sales/deals/".to_string(),
            token: None,
        };

        assert!(guard.on_response(StatusCode::FORBIDDEN, &ctx).is_ok());
        assert!(!session.state().needs_login_redirect());

        assert!(guard.on_response(StatusCode::UNAUTHORIZED, &ctx).unwrap_err().is_unauthorized());
        assert!(session.state().needs_login_redirect());
    }
}
