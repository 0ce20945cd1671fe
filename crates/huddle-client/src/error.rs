//! Error types for the query transport

use thiserror::Error;

/// Errors that can occur when executing a query
#[derive(Debug, Error)]
pub enum QueryError {
    /// Service context without a complete username/password pair
    #[error("service credentials are missing")]
    MissingCredentials,

    /// Session context without a token
    #[error("session token is missing")]
    MissingToken,

    /// Rejected with 403 and the session could not supply a new token
    #[error("unauthorized: session token was rejected and could not be refreshed")]
    Unauthorized,

    /// Server returned an error status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body was not the expected result envelope
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A result could not be decoded into the requested type
    #[error("failed to decode result: {0}")]
    Decode(#[from] serde_json::Error),
}

impl QueryError {
    /// Raised before any network call; the caller has to fix its inputs
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::MissingCredentials | Self::MissingToken)
    }

    /// HTTP status code, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;
