//! Error types.

use thiserror::Error;

/// The main error type for SkillSwap operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network-related error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend returned an error response.
    #[error("Backend error [{status}]: {message}")]
    Backend { status: u16, message: String },

    /// Backend could not be reached or refused to serve the request.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A referenced document does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Operation requires authentication but none was provided.
    #[error("Authentication required")]
    AuthRequired,

    /// Authenticated user may not modify this document.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Invalid argument passed to an API method.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A document did not have the expected shape.
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// The live subscription was cancelled or its source went away.
    #[error("Subscription closed")]
    SubscriptionClosed,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Create a backend error.
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Error::Backend {
            status,
            message: message.into(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create a store-unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Error::StoreUnavailable(msg.into())
    }

    /// Check if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) | Error::StoreUnavailable(_) => true,
            Error::Backend { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::AuthRequired => true,
            Error::Backend { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// Check if this error means the referenced document is absent.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::Backend { status, .. } => *status == 404,
            _ => false,
        }
    }
}

/// Result type alias for SkillSwap operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::backend(503, "maintenance");
        assert_eq!(format!("{}", e), "Backend error [503]: maintenance");

        let e = Error::not_found("Listing", "abc");
        assert_eq!(format!("{}", e), "Listing not found: abc");
    }

    #[test]
    fn test_retryable() {
        assert!(Error::backend(503, "down").is_retryable());
        assert!(Error::unavailable("offline").is_retryable());
        assert!(!Error::backend(400, "bad request").is_retryable());
        assert!(!Error::AuthRequired.is_retryable());
    }

    #[test]
    fn test_classification() {
        assert!(Error::backend(401, "expired").is_auth_error());
        assert!(Error::backend(404, "gone").is_not_found());
        assert!(Error::not_found("Conversation", "a_b").is_not_found());
    }
}
