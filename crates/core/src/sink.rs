// SPDX-License-Identifier: MIT

//! The abstract logging façade a Meter emits onto.
//!
//! `meter-core` never picks a concrete logging backend for the *data path*:
//! callers wire up a [`LogSink`] (a production adapter is provided in
//! [`crate::tracing_sink`]) and the core only ever calls [`LogSink::enabled`]
//! and [`LogSink::emit`]. Each Meter owns a [`SinkPair`]: one sink for the
//! human-readable message channel, one for the machine-parsable data channel.

use crate::caller_stack::CallerStack;
use crate::marker::Marker;
use std::sync::Arc;

/// Log levels a sink may be asked to emit at. Ordered least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// An addressable logging channel: human-readable messages or
/// machine-parsable records, one per Meter side.
///
/// Implementations must be thread-safe (§5 "Shared resources": the sink is
/// shared and must be safe for concurrent use).
pub trait LogSink: Send + Sync {
    /// Whether a record at `level` would actually be recorded. The core
    /// consults this before building payloads so disabled channels pay no
    /// formatting cost.
    fn enabled(&self, level: Level) -> bool;

    /// Emit one record. `stack` carries an optional caller-stack attachment
    /// for tier-3/tier-4 diagnostics (see spec.md §4.7); `None` on the
    /// ordinary lifecycle events.
    fn emit(&self, level: Level, marker: Marker, text: &str, stack: Option<&CallerStack>);
}

/// A sink that drops everything and reports itself as always disabled.
/// Used for the data channel when `meter.enable_data = false`, and for
/// [`crate::meter::Meter::noop`].
pub struct NullSink;

impl LogSink for NullSink {
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn emit(&self, _level: Level, _marker: Marker, _text: &str, _stack: Option<&CallerStack>) {}
}

/// The pair of channels a Meter emits onto.
#[derive(Clone)]
pub struct SinkPair {
    pub message: Arc<dyn LogSink>,
    pub data: Arc<dyn LogSink>,
}

impl SinkPair {
    pub fn new(message: Arc<dyn LogSink>, data: Arc<dyn LogSink>) -> Self {
        Self { message, data }
    }

    /// Both channels wired to [`NullSink`].
    pub fn noop() -> Self {
        Self { message: Arc::new(NullSink), data: Arc::new(NullSink) }
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
