/*
[INPUT]:  Error sources (HTTP, API, serialization, auth, WebSocket)
[OUTPUT]: Structured error types with classification helpers
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the OpenNews adapter
#[derive(Error, Debug)]
pub enum OpenNewsError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// Credential was rejected by the upstream
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation timed out
    #[error("Timeout after {duration}s")]
    Timeout { duration: u64 },
}

impl OpenNewsError {
    /// Check if the error is retryable with a short backoff
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OpenNewsError::Http(_)
                | OpenNewsError::Timeout { .. }
                | OpenNewsError::WebSocket(_)
                | OpenNewsError::InvalidResponse(_)
        )
    }

    /// Check if the error indicates a rejected credential
    ///
    /// Also recognizes a 401 indicator in WebSocket handshake error text,
    /// since the upstream rejects a bad token during the HTTP upgrade.
    pub fn is_auth_error(&self) -> bool {
        match self {
            OpenNewsError::Authentication { .. } => true,
            OpenNewsError::Api { code, .. } => *code == 401,
            OpenNewsError::WebSocket(message) => message.contains("401"),
            _ => false,
        }
    }

    /// Check if the error is a plain network timeout
    pub fn is_timeout(&self) -> bool {
        match self {
            OpenNewsError::Timeout { .. } => true,
            OpenNewsError::Http(err) => err.is_timeout(),
            _ => false,
        }
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        OpenNewsError::Api {
            code: status.as_u16() as i32,
            message: message.into(),
        }
    }
}

/// Result type alias for OpenNews operations
pub type Result<T> = std::result::Result<T, OpenNewsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        let timeout_err = OpenNewsError::Timeout { duration: 30 };
        assert!(timeout_err.is_retryable());

        let auth_err = OpenNewsError::Authentication {
            message: "bad token".to_string(),
        };
        assert!(!auth_err.is_retryable());
    }

    #[test]
    fn test_error_is_auth_error() {
        let auth_err = OpenNewsError::Authentication {
            message: "rejected".to_string(),
        };
        assert!(auth_err.is_auth_error());
        assert!(OpenNewsError::api_error(StatusCode::UNAUTHORIZED, "no").is_auth_error());
        assert!(!OpenNewsError::Timeout { duration: 30 }.is_auth_error());
    }

    #[test]
    fn test_ws_handshake_auth_indicator() {
        let err = OpenNewsError::WebSocket("HTTP error: 401 Unauthorized".to_string());
        assert!(err.is_auth_error());

        let err = OpenNewsError::WebSocket("connection reset".to_string());
        assert!(!err.is_auth_error());
    }

    #[test]
    fn test_api_error_creation() {
        let err = OpenNewsError::api_error(StatusCode::BAD_REQUEST, "bad filter");
        match err {
            OpenNewsError::Api { code, message } => {
                assert_eq!(code, 400);
                assert_eq!(message, "bad filter");
            }
            _ => panic!("Expected Api error variant"),
        }
    }
}
