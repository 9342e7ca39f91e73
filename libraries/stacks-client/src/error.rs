//! Error types for the library service client.

use thiserror::Error;

/// Errors that can occur when talking to the library service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// No network connectivity; failed before any request was made
    #[error("No internet connection")]
    NoConnection,

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Server returned an error status
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Credentials were rejected
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Request requires authentication
    #[error("Unauthorized")]
    Unauthorized,

    /// Authentication flow failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Response body was not in the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Failed to decode a response body
    #[error("Failed to decode response: {0}")]
    Decoding(#[from] serde_json::Error),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// API-level error reported in an otherwise successful response
    #[error("API error: {0}")]
    Api(String),

    /// Transport-level request failure
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ClientError {
    /// Whether retrying the same request could plausibly succeed.
    ///
    /// Timeouts and transient 5xx responses are retryable. Authentication
    /// failures never are: replaying the same bad credentials cannot work.
    /// 4xx responses, decode failures, and missing resources are permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Timeout => true,
            ClientError::ServerError { status, .. } => (500..=599).contains(status),
            ClientError::Request(e) => e.is_timeout() || e.is_connect(),
            ClientError::NoConnection
            | ClientError::InvalidCredentials
            | ClientError::Unauthorized
            | ClientError::AuthenticationFailed(_)
            | ClientError::InvalidResponse(_)
            | ClientError::Decoding(_)
            | ClientError::NotFound(_)
            | ClientError::Api(_) => false,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_server_errors_are_retryable() {
        assert!(ClientError::Timeout.is_retryable());
        assert!(ClientError::ServerError { status: 500, message: String::new() }.is_retryable());
        assert!(ClientError::ServerError { status: 503, message: String::new() }.is_retryable());
    }

    #[test]
    fn permanent_failures_are_not_retryable() {
        assert!(!ClientError::ServerError { status: 400, message: String::new() }.is_retryable());
        assert!(!ClientError::ServerError { status: 404, message: String::new() }.is_retryable());
        assert!(!ClientError::InvalidCredentials.is_retryable());
        assert!(!ClientError::Unauthorized.is_retryable());
        assert!(!ClientError::NotFound("item".into()).is_retryable());
        assert!(!ClientError::NoConnection.is_retryable());
        assert!(!ClientError::Api("bad request".into()).is_retryable());
    }
}
