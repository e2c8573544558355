// SPDX-License-Identifier: MIT

use super::*;
use crate::caller_stack::CallerStack;

#[test]
fn capturing_sink_records_emitted_events() {
    let sink = CapturingSink::new();
    sink.emit(Level::Info, Marker::MsgOk, "orders.import#1", None);
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].marker, Marker::MsgOk);
    assert!(!records[0].had_stack);
}

#[test]
fn capturing_sink_records_stack_presence() {
    let sink = CapturingSink::new();
    let stack = CallerStack::empty();
    sink.emit(Level::Error, Marker::Bug, "boom", Some(&stack));
    assert!(sink.records()[0].had_stack);
}

#[test]
fn capturing_sink_with_min_level_gates_enabled() {
    let sink = CapturingSink::with_min_level(Level::Warn);
    assert!(!sink.enabled(Level::Info));
    assert!(sink.enabled(Level::Warn));
    assert!(sink.enabled(Level::Error));
}

#[test]
fn default_capturing_sink_is_always_enabled() {
    let sink = CapturingSink::new();
    assert!(sink.enabled(Level::Trace));
}
