//! Error types for n1ql-request

use thiserror::Error;

/// Result type alias for request-building operations
pub type RequestResult<T> = Result<T, RequestError>;

/// Error types raised while configuring or materializing a query request
#[derive(Debug, Error)]
pub enum RequestError {
    /// A setter received a value it cannot accept (blank statement, incomplete plan, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The value is well-formed but not supported by this client
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// A named parameter or credential key was added twice
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// The request cannot be materialized in its current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// JSON encoding/decoding error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RequestError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an unsupported error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    /// Create a duplicate key error
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey(key.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is an unsupported error
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }

    /// Check if this is a duplicate key error
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey(_))
    }

    /// Check if this is an invalid state error
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }

    #[cfg(feature = "tracing")]
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Unsupported(_) => "unsupported",
            Self::DuplicateKey(_) => "duplicate_key",
            Self::InvalidState(_) => "invalid_state",
            Self::Serialization(_) => "serialization",
        }
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
