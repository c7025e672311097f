//! Immutable limiter configuration and backoff tuning parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Uint};

/// Configuration for a [`RateLimiter`](crate::RateLimiter).
///
/// Fixed at construction; the limiter never reconfigures capacity or refill
/// rate afterwards.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use token_guard_core::RateLimiterConfig;
///
/// // 50-token burst, 5 tokens credited every 100ms.
/// let config = RateLimiterConfig::new(50, 5, Duration::from_millis(100));
/// assert!((config.rate_per_second() - 50.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Maximum number of tokens the bucket can hold (burst allowance).
    pub capacity: Uint,
    /// Number of tokens credited per refill round.
    pub refill_amount: Uint,
    /// Duration of one refill round.
    pub refill_interval: Duration,
}

impl RateLimiterConfig {
    /// Creates a new configuration. Validation happens at limiter
    /// construction, not here.
    pub fn new(capacity: Uint, refill_amount: Uint, refill_interval: Duration) -> Self {
        RateLimiterConfig {
            capacity,
            refill_amount,
            refill_interval,
        }
    }

    /// Checks the construction constraints: capacity, refill amount, and
    /// refill interval must all be positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.refill_amount == 0 {
            return Err(ConfigError::ZeroRefillAmount);
        }
        if self.refill_interval.is_zero() {
            return Err(ConfigError::ZeroRefillInterval);
        }
        Ok(())
    }

    /// Long-run average refill rate in tokens per second.
    pub fn rate_per_second(&self) -> f64 {
        self.refill_amount as f64 / self.refill_interval.as_secs_f64()
    }
}

/// Tuning parameters for the blocking acquisition loop.
///
/// When tokens are present but a debit keeps losing races, the loop escalates
/// through `spin_limit` busy spins, then `yield_limit` cooperative yields,
/// then sleeps of `sleep_slice`, capping CPU cost under sustained contention.
/// `sleep_slice` also bounds each nap while a
/// [`CancelToken`](crate::CancelToken) is attached, so cancellation latency
/// stays within one slice.
///
/// These are tuning parameters, not contracts; the defaults suit most
/// workloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Busy-spin attempts before escalating.
    pub spin_limit: u32,
    /// Cooperative yield attempts before escalating to sleeps.
    pub yield_limit: u32,
    /// Sleep duration once spinning and yielding are exhausted, and the nap
    /// granularity while a cancel token is attached.
    pub sleep_slice: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        BackoffConfig {
            spin_limit: 64,
            yield_limit: 16,
            sleep_slice: Duration::from_millis(1),
        }
    }
}
