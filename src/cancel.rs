//! Cooperative cancellation for blocking waits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable cancellation flag for aborting blocking acquisition.
///
/// Clones share the same flag. Pass a token to
/// [`RateLimiter::acquire_n_with`](crate::RateLimiter::acquire_n_with) and
/// call [`cancel`](Self::cancel) from any thread to make the waiter return
/// [`AcquireError::Cancelled`](crate::AcquireError::Cancelled) without
/// consuming tokens. Cancellation is sticky: once set, the token stays
/// cancelled.
///
/// # Example
///
/// ```rust
/// use token_guard_core::CancelToken;
///
/// let token = CancelToken::new();
/// let handle = token.clone();
/// assert!(!token.is_cancelled());
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a fresh, non-cancelled token.
    pub fn new() -> Self {
        CancelToken::default()
    }

    /// Signals every holder of this token to stop waiting.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
