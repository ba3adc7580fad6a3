//! Error types for feed requests.
//!
//! Every failure of a fetch surfaces as a [`FeedError`]. Nothing is retried
//! internally; [`FeedError::is_retryable`] is a hint for callers that want
//! to retry themselves.

use reqwest::StatusCode;
use sheetfeed_core::TreeError;
use thiserror::Error;

/// A specialized Result type for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;

/// Message of [`FeedError::Auth`].
pub const INVALID_AUTH_MESSAGE: &str = "Invalid authorization key.";

/// An error that occurred while fetching or reading a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// A required argument is missing. Returned before any I/O.
    #[error("{0}")]
    InvalidArgument(String),

    /// The feed rejected the credential (HTTP 401).
    #[error("Invalid authorization key.")]
    Auth,

    /// The feed answered with another HTTP error status.
    #[error("HTTP error {status}: {reason}")]
    Http {
        /// Numeric status code.
        status: u16,
        /// Standard reason phrase for the status.
        reason: String,
    },

    /// The response body is not a well-formed feed.
    #[error(transparent)]
    Parse(#[from] TreeError),

    /// The request could not be sent or the body could not be read.
    #[error("transport error: {message}")]
    Transport {
        /// What failed.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The client configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl FeedError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates an HTTP error from a response status.
    pub fn http(status: StatusCode) -> Self {
        Self::Http {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }

    /// Creates a transport error without a source.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a transport error caused by `source`.
    pub fn transport_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns the HTTP status for [`FeedError::Http`] and [`FeedError::Auth`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth => Some(StatusCode::UNAUTHORIZED.as_u16()),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Http { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_message() {
        let err = FeedError::Auth;
        assert_eq!(err.to_string(), INVALID_AUTH_MESSAGE);
        assert_eq!(err.status(), Some(401));
        assert!(!err.is_retryable());
    }

    #[test]
    fn http_error_carries_reason_phrase() {
        let err = FeedError::http(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "HTTP error 500: Internal Server Error");
        assert_eq!(err.status(), Some(500));
        assert!(err.is_retryable());

        let err = FeedError::http(StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "HTTP error 404: Not Found");
        assert!(!err.is_retryable());
    }

    #[test]
    fn http_error_for_unknown_status() {
        let status = StatusCode::from_u16(599).unwrap();
        let err = FeedError::http(status);
        assert!(matches!(err, FeedError::Http { status: 599, .. }));
    }

    #[test]
    fn invalid_argument_displays_message() {
        let err = FeedError::invalid_argument("Worksheet not specified.");
        assert_eq!(err.to_string(), "Worksheet not specified.");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn transport_error_with_source() {
        use std::error::Error;
        let io_err = std::io::Error::other("connection reset");
        let err = FeedError::transport_with_source("failed to read body", io_err);
        assert!(err.source().is_some());
        assert!(err.is_retryable());
        assert!(err.to_string().contains("failed to read body"));
    }

    #[test]
    fn parse_error_is_transparent() {
        let tree_err = TreeError::MissingRoot;
        let expected = tree_err.to_string();
        let err = FeedError::from(tree_err);
        assert_eq!(err.to_string(), expected);
    }
}
