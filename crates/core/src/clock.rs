// SPDX-License-Identifier: MIT

//! Monotonic nanosecond time source, injectable for deterministic tests.
//!
//! The Meter state machine only ever reasons about elapsed nanoseconds, never
//! wall-clock dates, so [`Clock::now_nanos`] is anchored to process start
//! rather than the Unix epoch. `0` is reserved to mean "unset timestamp" by
//! [`crate::data::MeterData`], so a real reading is never `0`.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// A monotonic nanosecond clock.
pub trait Clock: Send + Sync {
    fn now_nanos(&self) -> u64;
}

fn process_origin() -> &'static Instant {
    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    ORIGIN.get_or_init(Instant::now)
}

/// Production clock backed by [`std::time::Instant`].
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> u64 {
        process_origin().elapsed().as_nanos() as u64 + 1
    }
}

/// Manually-advanced clock for deterministic tests.
#[derive(Clone)]
pub struct FakeClock {
    nanos: Arc<AtomicU64>,
}

impl FakeClock {
    /// Starts at nanosecond `1`.
    pub fn new() -> Self {
        Self { nanos: Arc::new(AtomicU64::new(1)) }
    }

    pub fn advance_nanos(&self, delta: u64) {
        self.nanos.fetch_add(delta, Ordering::SeqCst);
    }

    pub fn advance_millis(&self, delta_ms: u64) {
        self.advance_nanos(delta_ms * 1_000_000);
    }

    pub fn set_nanos(&self, value: u64) {
        self.nanos.store(value.max(1), Ordering::SeqCst);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now_nanos(&self) -> u64 {
        self.nanos.load(Ordering::SeqCst)
    }
}

/// Process-wide default clock, used when a Meter is constructed without an
/// explicit clock.
pub fn default_clock() -> Arc<dyn Clock> {
    static DEFAULT: OnceLock<Arc<dyn Clock>> = OnceLock::new();
    DEFAULT.get_or_init(|| Arc::new(SystemClock) as Arc<dyn Clock>).clone()
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
