//! Lookup error types

use thiserror::Error;

/// Lookup error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LookupError {
    pub kind: LookupErrorKind,
    pub message: String,
}

impl LookupError {
    pub fn new(kind: LookupErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::Network, message)
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::RateLimit, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::ServerError, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::Auth, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::InvalidRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::NotFound, message)
    }

    pub fn unconfigured() -> Self {
        Self::new(
            LookupErrorKind::Unconfigured,
            "No lookup service configured (set LOOKUP_URL)",
        )
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::Unknown, message)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupErrorKind {
    /// Network issues, timeouts
    Network,
    /// Rate limited (429)
    RateLimit,
    /// Server error (5xx)
    ServerError,
    /// Authentication failed (401, 403)
    Auth,
    /// Bad request (400)
    InvalidRequest,
    /// The service has no answer for the query (404 or empty result)
    NotFound,
    /// No lookup service configured for this process
    Unconfigured,
    /// Unknown error
    Unknown,
}

impl LookupErrorKind {
    /// Transient failures; a later run over the same file may succeed.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Network | Self::RateLimit | Self::ServerError)
    }
}
