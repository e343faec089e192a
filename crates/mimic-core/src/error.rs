//! Error types for registration, dispatch and response building.

use crate::config::error::ConfigError;
use thiserror::Error;

/// Boxed error produced by content and stream producers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by [`MockHandler`](crate::mocks::handler::MockHandler) and friends.
#[derive(Debug, Error)]
pub enum MockError {
    /// A required argument was empty or inconsistent. Nothing was mutated.
    #[error("Invalid argument: {what}")]
    InvalidArgument { what: String },

    /// No registration matched and the handler is configured to fail on misses.
    #[error("No registration for {method} {uri}")]
    MissingRegistration { method: String, uri: String },

    /// The content or stream producer failed. The original error is kept as-is.
    #[error(transparent)]
    ContentProduction(BoxError),

    /// A response body could not be decoded as requested.
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] BoxError),

    /// A scope token was released while an inner scope was still open.
    #[error("Scope released out of order: expected scope #{expected}, got #{found}")]
    ScopeOrder { expected: u64, found: u64 },

    /// Fixture or options file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl MockError {
    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        MockError::InvalidArgument { what: what.into() }
    }

    /// The producer's original error, if this is a content production failure.
    ///
    /// Use `downcast_ref` on the result to assert on the concrete failure kind.
    pub fn producer_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            MockError::ContentProduction(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Result type for mock operations.
pub type MockResult<T> = Result<T, MockError>;
