//! Transport error types

use crate::context::ContextError;
use thiserror::Error;

/// Errors returned by a [`RequestSender`](super::RequestSender)
///
/// Errors from the network layer are carried as-is; no sender in this crate
/// wraps or reclassifies another sender's error.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request's context was canceled or its deadline passed
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Network-level failure from `reqwest`
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The request URL could not be parsed
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Failure reported by a custom sender
    #[error("request sender error: {0}")]
    Sender(String),
}

impl TransportError {
    /// Create a new invalid URL error
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a new sender error
    pub fn sender(message: impl Into<String>) -> Self {
        Self::Sender(message.into())
    }

    /// The context error, if the request was stopped by its context
    pub fn context_error(&self) -> Option<ContextError> {
        match self {
            Self::Context(err) => Some(*err),
            _ => None,
        }
    }

    /// Whether the failure came from the request's deadline
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Context(err) => *err == ContextError::DeadlineExceeded,
            Self::Http(err) => err.is_timeout(),
            _ => false,
        }
    }
}
