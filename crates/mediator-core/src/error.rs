//! Error types for signal dispatch.

use thiserror::Error;

/// Errors that can occur while signalling a handler definition.
///
/// Every variant is returned at the [`signal`](crate::Mediator::signal) call
/// boundary. Nothing is retried or recovered internally.
#[derive(Debug, Error)]
pub enum SignalError {
    /// `signal` was called without a context.
    #[error("no context provided for signal")]
    MissingContext,

    /// The handler definition matches none of the recognised shapes.
    #[error("invalid handler definition: {reason}")]
    InvalidDefinition {
        /// Why the definition was rejected.
        reason: String,
    },

    /// No registered director exposes the handler.
    ///
    /// Only produced under [`UnmatchedPolicy::Strict`](crate::UnmatchedPolicy::Strict).
    #[error("no director handles '{handler}'")]
    NoHandler {
        /// The handler name that went unmatched.
        handler: String,
    },

    /// A positional argument could not be converted to the handler's parameter type.
    #[error("argument {index} of handler '{handler}' has the wrong shape: {source}")]
    Argument {
        /// The handler being invoked.
        handler: String,
        /// Zero-based position of the offending argument.
        index: usize,
        /// The underlying conversion error.
        #[source]
        source: serde_json::Error,
    },
}

impl SignalError {
    /// Creates an invalid definition error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            reason: reason.into(),
        }
    }
}

/// Failure to convert one positional argument, before the handler name is known.
///
/// Handlers report this; the director attaches the handler name when it
/// lifts it into a [`SignalError::Argument`].
#[derive(Debug, Error)]
#[error("argument {index}: {source}")]
pub struct ArgumentError {
    /// Zero-based position of the offending argument.
    pub index: usize,
    /// The underlying conversion error.
    #[source]
    pub source: serde_json::Error,
}

impl ArgumentError {
    /// Attaches the handler name.
    pub fn for_handler(self, handler: &str) -> SignalError {
        SignalError::Argument {
            handler: handler.to_string(),
            index: self.index,
            source: self.source,
        }
    }
}

/// Result type for signal operations.
pub type SignalResult<T> = Result<T, SignalError>;
