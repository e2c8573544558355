// SPDX-License-Identifier: MIT

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::marker::Marker;
use crate::sink::{Level, LogSink};
use parking_lot::Mutex;
use std::sync::Arc;

/// One record observed by a [`CapturingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub level: Level,
    pub marker: Marker,
    pub text: String,
    pub had_stack: bool,
}

/// A [`LogSink`] test double that records every emitted record instead of
/// forwarding it anywhere, so tests can assert on exactly what a Meter sent.
#[derive(Default)]
pub struct CapturingSink {
    records: Mutex<Vec<Captured>>,
    min_level: Option<Level>,
}

impl CapturingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { records: Mutex::new(Vec::new()), min_level: None })
    }

    /// A sink that reports itself disabled below `min_level`, so tests can
    /// exercise the "skip building payloads for a disabled level" contract.
    pub fn with_min_level(min_level: Level) -> Arc<Self> {
        Arc::new(Self { records: Mutex::new(Vec::new()), min_level: Some(min_level) })
    }

    pub fn records(&self) -> Vec<Captured> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for CapturingSink {
    fn enabled(&self, level: Level) -> bool {
        match self.min_level {
            Some(min) => level >= min,
            None => true,
        }
    }

    fn emit(&self, level: Level, marker: Marker, text: &str, stack: Option<&crate::caller_stack::CallerStack>) {
        self.records.lock().push(Captured { level, marker, text: text.to_string(), had_stack: stack.is_some() });
    }
}

/// Proptest strategies for the types whose invariants spec.md §8 quantifies
/// over.
#[cfg(feature = "proptest")]
pub mod strategies {
    use crate::cause::Cause;
    use crate::data::MeterData;
    use indexmap::IndexMap;
    use proptest::prelude::*;

    pub fn arb_cause() -> impl Strategy<Value = Cause> {
        prop_oneof![
            "[a-z]{1,12}".prop_map(Cause::Str),
            "[A-Z][a-zA-Z]{1,12}".prop_map(Cause::Named),
            ("[A-Z][a-zA-Z]{1,12}", "[a-z ]{1,24}").prop_map(|(type_name, message)| Cause::Error { type_name, message }),
        ]
    }

    /// A minimally-valid, already-created `MeterData` suitable for round-trip
    /// and derived-state property tests.
    pub fn arb_meter_data() -> impl Strategy<Value = MeterData> {
        (
            "[a-zA-Z0-9]{4,12}",
            1u64..10_000,
            "[a-z][a-z.]{0,20}",
            proptest::option::of("[a-z][a-z_]{0,12}"),
            0u64..1_000,
        )
            .prop_map(|(session_uuid, position, category, operation, current_iteration)| MeterData {
                session_uuid,
                position,
                category,
                operation,
                current_iteration,
                context: IndexMap::new(),
                ..Default::default()
            })
    }
}

#[cfg(test)]
#[path = "test_support_tests.rs"]
mod tests;
