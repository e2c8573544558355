// SPDX-License-Identifier: MIT

//! The default production [`LogSink`] adapter, bridging onto `tracing`.
//!
//! This is the concrete message/data sink pairing a real caller reaches for
//! first — analogous to how other instrumentation crates in this workspace
//! bridge their own domain events onto `tracing` spans and fields rather
//! than inventing a parallel logging backend.

use crate::caller_stack::CallerStack;
use crate::marker::Marker;
use crate::sink::{Level, LogSink};

/// Routes [`LogSink::emit`] calls to `tracing::event!` at the matching
/// level, under a logger name built from `target` plus the configured
/// prefix/suffix (spec.md §6 `meter.message.prefix` / `meter.data.prefix`
/// etc.), with the marker carried as a structured field.
pub struct TracingSink {
    target: &'static str,
}

impl TracingSink {
    /// `target` becomes the `tracing` target string, e.g. `"meter::message"`
    /// or `"meter::data"` — distinct targets are how callers route the two
    /// channels to different subscribers/filters.
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }

    pub fn message() -> Self {
        Self::new("meter::message")
    }

    pub fn data() -> Self {
        Self::new("meter::data")
    }
}

impl LogSink for TracingSink {
    fn enabled(&self, level: Level) -> bool {
        match level {
            Level::Trace => tracing::enabled!(target: "meter", tracing::Level::TRACE),
            Level::Debug => tracing::enabled!(target: "meter", tracing::Level::DEBUG),
            Level::Info => tracing::enabled!(target: "meter", tracing::Level::INFO),
            Level::Warn => tracing::enabled!(target: "meter", tracing::Level::WARN),
            Level::Error => tracing::enabled!(target: "meter", tracing::Level::ERROR),
        }
    }

    fn emit(&self, level: Level, marker: Marker, text: &str, stack: Option<&CallerStack>) {
        let marker_name = marker.to_string();
        let stack_str = stack.map(CallerStack::as_str).unwrap_or("");
        match level {
            Level::Trace => {
                tracing::trace!(target: "meter", logger = self.target, marker = %marker_name, caller_stack = stack_str, "{text}")
            }
            Level::Debug => {
                tracing::debug!(target: "meter", logger = self.target, marker = %marker_name, caller_stack = stack_str, "{text}")
            }
            Level::Info => {
                tracing::info!(target: "meter", logger = self.target, marker = %marker_name, caller_stack = stack_str, "{text}")
            }
            Level::Warn => {
                tracing::warn!(target: "meter", logger = self.target, marker = %marker_name, caller_stack = stack_str, "{text}")
            }
            Level::Error => {
                tracing::error!(target: "meter", logger = self.target, marker = %marker_name, caller_stack = stack_str, "{text}")
            }
        }
    }
}

#[cfg(test)]
#[path = "tracing_sink_tests.rs"]
mod tests;
