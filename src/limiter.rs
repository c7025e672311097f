//! The public rate limiter: construction, acquisition tiers, and snapshots.

use std::hint;
use std::thread;
use std::time::{Duration, Instant};

use log::warn;

use crate::bucket::BucketState;
use crate::cancel::CancelToken;
use crate::config::{BackoffConfig, RateLimiterConfig};
use crate::error::{AcquireError, AcquireResult, ConfigError};
use crate::metrics::MetricsSnapshot;
use crate::Uint;

/// A thread-safe token bucket admission controller.
///
/// The bucket starts full and refills lazily: every operation settles elapsed
/// refill rounds against the monotonic clock before acting, so no background
/// timer exists and an idle limiter's token count may look stale until the
/// next access or an explicit [`snapshot`](Self::snapshot).
///
/// Share via `Arc`; all methods take `&self`.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use token_guard_core::{RateLimiter, RateLimiterConfig};
///
/// let limiter = RateLimiter::new(RateLimiterConfig::new(
///     3,                          // burst capacity
///     1,                          // tokens per round
///     Duration::from_millis(100), // round length
/// ))
/// .unwrap();
///
/// assert!(limiter.try_acquire());
/// assert!(limiter.try_acquire());
/// assert!(limiter.try_acquire());
/// assert!(!limiter.try_acquire()); // burst spent
/// ```
pub struct RateLimiter {
    config: RateLimiterConfig,
    backoff: BackoffConfig,
    bucket: BucketState,
}

impl RateLimiter {
    /// Creates a limiter from a validated configuration, starting at full
    /// capacity.
    ///
    /// Emits a `warn` log (not an error) when `refill_amount > capacity`: a
    /// single refill round then overshoots the bucket and most of its credit
    /// is discarded, which is usually a misconfiguration but still a
    /// well-defined one.
    pub fn new(config: RateLimiterConfig) -> Result<Self, ConfigError> {
        Self::with_backoff(config, BackoffConfig::default())
    }

    /// Creates a limiter with explicit backoff tuning for the blocking loop.
    pub fn with_backoff(
        config: RateLimiterConfig,
        backoff: BackoffConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.refill_amount > config.capacity {
            warn!(
                "refill_amount {} exceeds capacity {}; each refill round will overshoot the bucket",
                config.refill_amount, config.capacity
            );
        }
        let bucket = BucketState::new(&config, Instant::now());
        Ok(RateLimiter {
            config,
            backoff,
            bucket,
        })
    }

    /// The configuration this limiter was built with.
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Attempts to acquire one token without blocking.
    pub fn try_acquire(&self) -> bool {
        matches!(self.try_acquire_n(1), Ok(true))
    }

    /// Attempts to acquire `tokens` tokens without blocking.
    ///
    /// Returns `Ok(true)` on a grant and `Ok(false)` when insufficient tokens
    /// are available. A request larger than the bucket capacity is
    /// unsatisfiable at any point in time, so it returns `Ok(false)`
    /// immediately without settling refills or touching state.
    ///
    /// # Errors
    /// * [`AcquireError::InvalidArgument`] if `tokens` is zero.
    pub fn try_acquire_n(&self, tokens: Uint) -> Result<bool, AcquireError> {
        if tokens == 0 {
            return Err(AcquireError::InvalidArgument);
        }
        if tokens > self.bucket.capacity() {
            return Ok(false);
        }
        self.bucket.sync(Instant::now());
        Ok(self.bucket.try_debit(tokens))
    }

    /// Blocks until one token is acquired.
    ///
    /// See [`acquire_n`](Self::acquire_n).
    pub fn acquire(&self) -> AcquireResult {
        self.acquire_n(1)
    }

    /// Blocks until `tokens` tokens are acquired.
    ///
    /// Waits are driven by the estimated time to the refill round that covers
    /// the shortfall; when tokens are present but contended, the loop
    /// escalates through a bounded spin, cooperative yields, and short sleeps
    /// per the limiter's [`BackoffConfig`].
    ///
    /// # Errors
    /// * [`AcquireError::InvalidArgument`] if `tokens` is zero.
    /// * [`AcquireError::BeyondCapacity`] if `tokens` exceeds the bucket
    ///   capacity; blocking would never succeed.
    pub fn acquire_n(&self, tokens: Uint) -> AcquireResult {
        self.block_on(tokens, None, None)
    }

    /// Blocks until `tokens` tokens are acquired or `timeout` elapses.
    ///
    /// # Errors
    /// * [`AcquireError::TimedOut`] on expiry, with zero tokens consumed.
    /// * Plus the [`acquire_n`](Self::acquire_n) validation errors.
    pub fn acquire_n_within(&self, tokens: Uint, timeout: Duration) -> AcquireResult {
        self.block_on(tokens, Instant::now().checked_add(timeout), None)
    }

    /// Blocks until `tokens` tokens are acquired or the absolute `deadline`
    /// passes.
    pub fn acquire_n_until(&self, tokens: Uint, deadline: Instant) -> AcquireResult {
        self.block_on(tokens, Some(deadline), None)
    }

    /// Blocks until `tokens` tokens are acquired, the optional `deadline`
    /// passes, or `cancel` is triggered.
    ///
    /// While a token is attached, naps are chunked at the configured
    /// `sleep_slice`, so cancellation is observed within one slice.
    ///
    /// # Errors
    /// * [`AcquireError::Cancelled`] on cancellation, with zero tokens
    ///   consumed.
    /// * Plus the [`acquire_n_within`](Self::acquire_n_within) errors.
    pub fn acquire_n_with(
        &self,
        tokens: Uint,
        deadline: Option<Instant>,
        cancel: &CancelToken,
    ) -> AcquireResult {
        self.block_on(tokens, deadline, Some(cancel))
    }

    /// Settles pending refills and returns a point-in-time metrics view.
    /// Never consumes tokens.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let now = Instant::now();
        self.bucket.sync(now);
        MetricsSnapshot {
            available_tokens: self.bucket.available(),
            capacity: self.bucket.capacity(),
            rate_per_second: self.config.rate_per_second(),
            time_until_next_refill: self.bucket.time_until_next_refill(now),
        }
    }

    /// The shared blocking loop behind `acquire_n`, `acquire_n_within`,
    /// `acquire_n_until`, and `acquire_n_with`.
    fn block_on(
        &self,
        tokens: Uint,
        deadline: Option<Instant>,
        cancel: Option<&CancelToken>,
    ) -> AcquireResult {
        if tokens == 0 {
            return Err(AcquireError::InvalidArgument);
        }
        if tokens > self.bucket.capacity() {
            return Err(AcquireError::BeyondCapacity {
                acquiring: tokens,
                capacity: self.bucket.capacity(),
            });
        }

        let started = Instant::now();
        let mut spins: u32 = 0;
        let mut yields: u32 = 0;
        loop {
            if let Some(token) = cancel {
                if token.is_cancelled() {
                    return Err(AcquireError::Cancelled { acquiring: tokens });
                }
            }
            let now = Instant::now();
            if let Some(deadline) = deadline {
                if now >= deadline {
                    return Err(AcquireError::TimedOut {
                        acquiring: tokens,
                        waited: now.saturating_duration_since(started),
                    });
                }
            }

            self.bucket.sync(now);
            if self.bucket.try_debit(tokens) {
                return Ok(());
            }

            let wait = self.bucket.estimated_wait(tokens, now);
            if wait.is_zero() {
                // Tokens are there but we keep losing debit races; escalate
                // to cap CPU cost under sustained contention.
                if spins < self.backoff.spin_limit {
                    spins += 1;
                    hint::spin_loop();
                } else if yields < self.backoff.yield_limit {
                    yields += 1;
                    thread::yield_now();
                } else {
                    thread::sleep(self.backoff.sleep_slice);
                }
            } else {
                // Genuine shortfall: sleep toward the covering refill round
                // and re-verify. The estimate is advisory, not a reservation.
                spins = 0;
                yields = 0;
                let mut nap = wait;
                if let Some(deadline) = deadline {
                    nap = nap.min(deadline.saturating_duration_since(now));
                }
                if cancel.is_some() {
                    nap = nap.min(self.backoff.sleep_slice);
                }
                thread::sleep(nap);
            }
        }
    }
}
