//! Point-in-time metrics view of a limiter.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Uint;

/// Immutable snapshot of bucket state, produced by
/// [`RateLimiter::snapshot`](crate::RateLimiter::snapshot).
///
/// The numeric fields are the intended export surface for a pull-based
/// monitoring pipeline; serialize the struct or read the gauges directly.
/// Taking a snapshot settles pending refills but never consumes tokens, so it
/// is safe to call at arbitrary frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Tokens available at the moment of the snapshot.
    pub available_tokens: Uint,
    /// Maximum tokens the bucket can hold.
    pub capacity: Uint,
    /// Long-run average refill rate in tokens per second.
    pub rate_per_second: f64,
    /// Time remaining until the next refill round fires.
    pub time_until_next_refill: Duration,
}

impl MetricsSnapshot {
    /// Fraction of capacity currently available, in `[0.0, 1.0]`.
    pub fn fill_ratio(&self) -> f64 {
        self.available_tokens as f64 / self.capacity as f64
    }
}
