//! Shared bucket state and the lazy refill engine.
//!
//! Two logically-coupled atomic cells hold the mutable state: the available
//! token count and the refill watermark (nanoseconds since a
//! construction-time origin instant). The watermark only advances, and only
//! in whole multiples of the refill interval, so sub-round remainder time is
//! preserved and the long-run rate never drifts low.
//!
//! The commit protocol pairs the two cells without a lock: a single
//! compare-and-swap moves the watermark forward, and only the caller whose
//! swap succeeds credits the corresponding tokens. Losers credit nothing and
//! re-read. This yields exactly one credit per elapsed round regardless of
//! how many threads race through a sync. A single mutex over both fields
//! would be a correct, simpler substitute at lower peak throughput.

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use crate::config::RateLimiterConfig;
use crate::{AtomicUint, Uint};

pub(crate) struct BucketState {
    capacity: Uint,
    refill_amount: Uint,
    /// Refill interval in nanoseconds. Nonzero by construction.
    interval_nanos: u64,
    /// Anchor for converting `Instant`s to watermark offsets.
    origin: Instant,
    /// Current token count. Invariant: `0 <= available <= capacity` at every
    /// observable point.
    available: AtomicUint,
    /// Nanoseconds since `origin` up to which refill credit has been applied.
    /// Only advances, in multiples of `interval_nanos`.
    watermark: AtomicUint,
}

impl BucketState {
    /// Initializes a full bucket with the watermark at `now`.
    pub(crate) fn new(config: &RateLimiterConfig, now: Instant) -> Self {
        BucketState {
            capacity: config.capacity,
            refill_amount: config.refill_amount,
            interval_nanos: config.refill_interval.as_nanos().min(u64::MAX as u128) as u64,
            origin: now,
            available: AtomicUint::new(config.capacity),
            watermark: AtomicUint::new(0),
        }
    }

    fn nanos_since_origin(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.origin)
            .as_nanos()
            .min(u64::MAX as u128) as u64
    }

    /// Settles the bucket against `now`: credits every whole refill round
    /// elapsed since the watermark and advances the watermark past them.
    ///
    /// Zero elapsed rounds is a no-op that writes nothing, so idle syncs do
    /// not contend. Under a race, the losing thread re-reads the advanced
    /// watermark and usually finds nothing left to credit.
    pub(crate) fn sync(&self, now: Instant) {
        let now_nanos = self.nanos_since_origin(now);
        loop {
            let watermark = self.watermark.load(Ordering::Acquire);
            if now_nanos <= watermark {
                return;
            }
            let rounds = (now_nanos - watermark) / self.interval_nanos;
            if rounds == 0 {
                return;
            }
            let advanced = watermark.saturating_add(rounds.saturating_mul(self.interval_nanos));
            if self
                .watermark
                .compare_exchange_weak(watermark, advanced, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                // Winning the watermark advance authorizes exactly this credit.
                self.credit(rounds.saturating_mul(self.refill_amount));
                return;
            }
        }
    }

    /// Adds tokens, capped at capacity.
    fn credit(&self, tokens: Uint) {
        loop {
            let current = self.available.load(Ordering::Acquire);
            let next = current.saturating_add(tokens).min(self.capacity);
            if next == current {
                return;
            }
            if self
                .available
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return;
            }
        }
    }

    /// Atomically debits `tokens` if that many are available. Retries are
    /// bounded only by contention, never by a time budget. All-or-nothing.
    pub(crate) fn try_debit(&self, tokens: Uint) -> bool {
        loop {
            let current = self.available.load(Ordering::Acquire);
            if current < tokens {
                return false;
            }
            if self
                .available
                .compare_exchange_weak(
                    current,
                    current - tokens,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok()
            {
                return true;
            }
        }
    }

    pub(crate) fn available(&self) -> Uint {
        self.available.load(Ordering::Acquire)
    }

    pub(crate) fn capacity(&self) -> Uint {
        self.capacity
    }

    /// Estimates how long until `tokens` could be available, assuming no
    /// other consumers. Call after [`sync`](Self::sync).
    ///
    /// Advisory only: refill is lazy and concurrent callers may take the
    /// tokens first, so a waiter must re-verify state after sleeping this
    /// long.
    pub(crate) fn estimated_wait(&self, tokens: Uint, now: Instant) -> Duration {
        let available = self.available.load(Ordering::Acquire);
        if available >= tokens {
            return Duration::ZERO;
        }
        let missing = tokens - available;
        let rounds_needed = missing.saturating_add(self.refill_amount - 1) / self.refill_amount;
        let next_event = self
            .watermark
            .load(Ordering::Acquire)
            .saturating_add(rounds_needed.saturating_mul(self.interval_nanos));
        Duration::from_nanos(next_event.saturating_sub(self.nanos_since_origin(now)))
    }

    /// Time until the next refill round fires. In `(0, interval]` right after
    /// a sync.
    pub(crate) fn time_until_next_refill(&self, now: Instant) -> Duration {
        let next_event = self
            .watermark
            .load(Ordering::Acquire)
            .saturating_add(self.interval_nanos);
        Duration::from_nanos(next_event.saturating_sub(self.nanos_since_origin(now)))
    }
}
