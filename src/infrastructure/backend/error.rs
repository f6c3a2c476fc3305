//! Backend error classification.

use thiserror::Error;

/// Errors that can occur when calling the Ollama backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Invalid request parameters, or an unknown model.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded, retry after waiting.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The backend encountered an internal error.
    #[error("Server error ({status}): {body}")]
    ServerError { status: u16, body: String },

    /// Network error occurred during the request.
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// Request timed out waiting for a response.
    #[error("Timeout waiting for response")]
    Timeout,

    /// The backend answered with a body we could not use.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl BackendError {
    /// Returns true if this error is transient and should be retried.
    ///
    /// Transient: rate limits, 5xx server errors, timeouts, network
    /// failures (unreachable host, dropped connection). Permanent: 4xx
    /// client errors and unusable response bodies.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BackendError::RateLimitExceeded
                | BackendError::ServerError { .. }
                | BackendError::Timeout
                | BackendError::Network(_)
        )
    }

    /// Map an HTTP status code and response body to an error variant.
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 | 404 => BackendError::InvalidRequest(body),
            429 => BackendError::RateLimitExceeded,
            s if status.is_server_error() => BackendError::ServerError { status: s, body },
            s => BackendError::UnexpectedResponse(format!("HTTP {s}: {body}")),
        }
    }

    /// Map a reqwest transport error, folding timeouts into their own
    /// variant.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else {
            BackendError::Network(err)
        }
    }
}

impl From<BackendError> for crate::domain::errors::QueryError {
    fn from(err: BackendError) -> Self {
        crate::domain::errors::QueryError::BackendUnavailable(err.to_string())
    }
}
