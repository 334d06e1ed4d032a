use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - session is no longer valid")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {message}")]
    BadRequest {
        message: String,
        errors: BTreeMap<String, Vec<String>>,
    },

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Keys the backend uses for messages that are not tied to a single field.
const HEADLINE_KEYS: [&str; 4] = ["non_field_errors", "detail", "error", "message"];

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Parse a validation error body: `{"field": ["msg", ...], "detail": "msg"}`.
    fn parse_validation_errors(body: &str) -> BTreeMap<String, Vec<String>> {
        let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body)
        else {
            return BTreeMap::new();
        };

        map.into_iter()
            .filter_map(|(field, value)| {
                let messages: Vec<String> = match value {
                    serde_json::Value::String(s) => vec![s],
                    serde_json::Value::Array(items) => items
                        .into_iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect(),
                    _ => Vec::new(),
                };
                (!messages.is_empty()).then_some((field, messages))
            })
            .collect()
    }

    fn bad_request(body: &str) -> Self {
        let errors = Self::parse_validation_errors(body);
        let message = HEADLINE_KEYS
            .iter()
            .find_map(|key| errors.get(*key).and_then(|m| m.first()))
            .or_else(|| errors.values().next().and_then(|m| m.first()))
            .cloned()
            .unwrap_or_else(|| Self::truncate_body(body));
        ApiError::BadRequest { message, errors }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            400 => Self::bad_request(body),
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// One-line message suitable for a dismissible notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            ApiError::AccessDenied(_) => "You do not have permission to do that.".to_string(),
            ApiError::NotFound(_) => "The requested record was not found.".to_string(),
            ApiError::BadRequest { message, .. } => message.clone(),
            ApiError::RateLimited => "Too many requests. Please wait and try again.".to_string(),
            ApiError::ServerError(_) => "The server encountered an error.".to_string(),
            ApiError::NetworkError(e) if e.is_timeout() => {
                "Connection timed out. Please try again.".to_string()
            }
            ApiError::NetworkError(_) => {
                "Unable to connect to server. Check your network connection.".to_string()
            }
            ApiError::InvalidResponse(_) | ApiError::InvalidHeader(_) => {
                "Received an unexpected response from the server.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_mapping() {
        assert!(ApiError::from_status(StatusCode::UNAUTHORIZED, "").is_unauthorized());
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "nope"),
            ApiError::AccessDenied(ref b) if b == "nope"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "down"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, ""),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_bad_request_prefers_non_field_errors() {
        let body = r#"{"non_field_errors": ["Invalid credentials"], "username": ["This field is required."]}"#;
        match ApiError::from_status(StatusCode::BAD_REQUEST, body) {
            ApiError::BadRequest { message, errors } => {
                assert_eq!(message, "Invalid credentials");
                assert_eq!(errors.len(), 2);
                assert_eq!(errors["username"], vec!["This field is required."]);
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_request_error_key_and_plain_body() {
        let body = r#"{"error": "No compensation plan assigned"}"#;
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, body);
        assert_eq!(err.user_message(), "No compensation plan assigned");

        let err = ApiError::from_status(StatusCode::BAD_REQUEST, "plain text");
        assert_eq!(err.user_message(), "plain text");
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.contains("truncated, 520 total bytes"));
        assert_eq!(ApiError::truncate_body("short"), "short");
    }
}
