// SPDX-License-Identifier: MIT

//! [`MeterData`]: the value object carrying every semantic attribute of one
//! Meter, plus the derived-state queries spec.md §3 defines over it.
//!
//! `MeterData` is a plain snapshot — it has no behavior of its own beyond
//! the derived getters. [`crate::meter::Meter`] owns the mutable instance
//! behind a lock and hands out snapshots via `Meter::data()`.

use indexmap::IndexMap;

/// One Meter's full semantic state. `0` in any timestamp field means
/// "unset" (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MeterData {
    pub session_uuid: String,
    pub position: u64,
    pub category: String,
    pub operation: Option<String>,
    pub parent: Option<String>,

    pub create_time: u64,
    pub start_time: u64,
    pub stop_time: u64,
    /// Internal bookkeeping for progress throttling, not part of the
    /// public codec key order.
    pub last_progress_time: u64,
    pub last_progress_iteration: u64,

    pub description: Option<String>,
    pub context: IndexMap<String, String>,

    pub current_iteration: u64,
    pub expected_iterations: u64,
    pub time_limit_ms: u64,

    pub ok_path: Option<String>,
    pub reject_path: Option<String>,
    pub fail_path: Option<String>,
    pub fail_message: Option<String>,
}

impl MeterData {
    pub fn full_id(&self) -> String {
        crate::session::full_id(&self.category, self.operation.as_deref(), self.position)
    }

    pub fn is_created(&self) -> bool {
        self.start_time == 0 && self.stop_time == 0
    }

    pub fn is_started(&self) -> bool {
        self.start_time != 0 && self.stop_time == 0
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_time != 0
    }

    pub fn is_ok(&self) -> bool {
        self.is_stopped() && self.reject_path.is_none() && self.fail_path.is_none()
    }

    pub fn is_reject(&self) -> bool {
        self.is_stopped() && self.reject_path.is_some()
    }

    pub fn is_fail(&self) -> bool {
        self.is_stopped() && self.fail_path.is_some()
    }

    /// Elapsed nanoseconds since `start_time`. `now` is only consulted while
    /// still running; `0` if never started.
    pub fn execution_time_nanos(&self, now: u64) -> u64 {
        if self.start_time == 0 {
            return 0;
        }
        let end = if self.stop_time != 0 { self.stop_time } else { now };
        end.saturating_sub(self.start_time)
    }

    pub fn execution_time_ms(&self, now: u64) -> u64 {
        self.execution_time_nanos(now) / 1_000_000
    }

    /// True once `time_limit_ms` is set and exceeded.
    pub fn is_slow(&self, now: u64) -> bool {
        self.time_limit_ms > 0 && self.start_time != 0 && self.execution_time_ms(now) > self.time_limit_ms
    }

    /// `0` when execution time is `0` (undefined throughput).
    pub fn iterations_per_second(&self, now: u64) -> f64 {
        let nanos = self.execution_time_nanos(now);
        if nanos == 0 {
            return 0.0;
        }
        let seconds = nanos as f64 / 1_000_000_000.0;
        self.current_iteration as f64 / seconds
    }
}

#[cfg(test)]
#[path = "data_tests.rs"]
mod tests;
