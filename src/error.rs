//! error.rs
//! Construction and acquisition error/result types.

use std::time::Duration;

use thiserror::Error;

use crate::Uint;

/// Error type for limiter construction. Every variant is fatal: the caller
/// must fix the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("capacity must be greater than 0")]
    ZeroCapacity,
    #[error("refill amount must be greater than 0")]
    ZeroRefillAmount,
    #[error("refill interval must be greater than 0")]
    ZeroRefillInterval,
}

/// Error type for token acquisition. Carries enough diagnostics for logging
/// and backoff decisions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquireError {
    /// Requested zero tokens. Fatal to the call only; bucket state is
    /// untouched.
    #[error("requested token count must be greater than 0")]
    InvalidArgument,

    /// Request permanently exceeds the configured capacity and can never be
    /// satisfied, so the blocking variants refuse it instead of waiting
    /// forever.
    #[error("requested {acquiring} token(s) exceeds capacity {capacity}; this request can never succeed")]
    BeyondCapacity { acquiring: Uint, capacity: Uint },

    /// The deadline expired before the tokens became available. Recoverable;
    /// zero tokens were consumed.
    #[error("timed out after {waited:?} waiting for {acquiring} token(s)")]
    TimedOut { acquiring: Uint, waited: Duration },

    /// The wait was cancelled through a [`CancelToken`](crate::CancelToken).
    /// Recoverable; zero tokens were consumed.
    #[error("cancelled while waiting for {acquiring} token(s)")]
    Cancelled { acquiring: Uint },
}

/// Result type for blocking and deadline-bounded acquisition.
pub type AcquireResult = Result<(), AcquireError>;
