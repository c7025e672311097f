//! Token bucket admission control for concurrent Rust applications.
//!
//! This library provides a single, thread-safe token bucket rate limiter with
//! a layered acquisition API: non-blocking, blocking, and deadline-bounded,
//! with optional cooperative cancellation. It is designed as an in-process
//! admission-control primitive and carries no async runtime.
//!
//! # Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use token_guard_core::{RateLimiter, RateLimiterConfig};
//!
//! // 100-token burst, refilling 10 tokens every second.
//! let config = RateLimiterConfig::new(100, 10, Duration::from_secs(1));
//! let limiter = RateLimiter::new(config).unwrap();
//!
//! // Non-blocking single-token admission check.
//! if limiter.try_acquire() {
//!     // admitted
//! } else {
//!     // over the limit, reject or defer
//! }
//! ```
//!
//! # Core Concepts
//!
//! ## Lazy, drift-free refill
//! There is no background timer. Every operation first settles the bucket
//! against the process monotonic clock: the elapsed time since the refill
//! watermark is divided into whole refill rounds, each round credits a fixed
//! token amount, and the watermark advances by exactly the rounds consumed.
//! Sub-round remainder time is preserved, so the long-run rate is exact.
//!
//! ## Acquisition tiers
//! - [`RateLimiter::try_acquire`] / [`RateLimiter::try_acquire_n`] — answer
//!   immediately.
//! - [`RateLimiter::acquire`] / [`RateLimiter::acquire_n`] — block until
//!   granted, escalating from a bounded spin through cooperative yields to
//!   real sleeps to cap CPU cost.
//! - [`RateLimiter::acquire_n_within`] / [`RateLimiter::acquire_n_until`] —
//!   the same loop bounded by a deadline, reporting
//!   [`AcquireError::TimedOut`] on expiry.
//! - [`RateLimiter::acquire_n_with`] — adds a [`CancelToken`] for cooperative
//!   abort.
//!
//! Grants are all-or-nothing: no failure path leaves a partial debit applied.
//!
//! ## Observability
//! [`RateLimiter::snapshot`] returns an immutable [`MetricsSnapshot`] suitable
//! for pull-based gauge export. It settles the bucket but never consumes
//! tokens.
//!
//! # Thread Safety
//!
//! A [`RateLimiter`] is safe for concurrent unsynchronized use; share it via
//! `Arc`. State lives in two atomic cells updated by compare-and-swap, with no
//! lock held across any operation. There is **no fairness guarantee**: a
//! newly-arriving `try_acquire` may take tokens ahead of a longer-waiting
//! blocked `acquire`.

use std::sync::atomic::AtomicU64;

mod bucket;
pub mod cancel;
pub mod config;
pub mod error;
pub mod limiter;
pub mod metrics;

pub use cancel::CancelToken;
pub use config::{BackoffConfig, RateLimiterConfig};
pub use error::{AcquireError, AcquireResult, ConfigError};
pub use limiter::RateLimiter;
pub use metrics::MetricsSnapshot;

/// Alias for the atomic cell type used in the bucket internals.
pub(crate) type AtomicUint = AtomicU64;

/// Alias for the unsigned integer type used for token counts.
///
/// Currently maps to [`u64`], which comfortably covers token capacities for
/// high-throughput applications and nanosecond watermark offsets for
/// centuries of uptime.
pub type Uint = u64;
