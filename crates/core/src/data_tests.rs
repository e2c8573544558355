// SPDX-License-Identifier: MIT

use super::*;

fn fresh() -> MeterData {
    MeterData {
        session_uuid: "aB3xQ9pL".to_string(),
        position: 1,
        category: "orders.import".to_string(),
        ..Default::default()
    }
}

#[test]
fn created_state() {
    let d = fresh();
    assert!(d.is_created());
    assert!(!d.is_started());
    assert!(!d.is_stopped());
}

#[test]
fn started_state() {
    let mut d = fresh();
    d.start_time = 100;
    assert!(!d.is_created());
    assert!(d.is_started());
    assert!(!d.is_stopped());
}

#[test]
fn stopped_ok_state() {
    let mut d = fresh();
    d.start_time = 100;
    d.stop_time = 500;
    assert!(d.is_stopped());
    assert!(d.is_ok());
    assert!(!d.is_reject());
    assert!(!d.is_fail());
}

#[test]
fn stopped_reject_state() {
    let mut d = fresh();
    d.start_time = 100;
    d.stop_time = 500;
    d.reject_path = Some("validation".to_string());
    assert!(d.is_reject());
    assert!(!d.is_ok());
    assert!(!d.is_fail());
}

#[test]
fn stopped_fail_state() {
    let mut d = fresh();
    d.start_time = 100;
    d.stop_time = 500;
    d.fail_path = Some("boom".to_string());
    assert!(d.is_fail());
    assert!(!d.is_ok());
    assert!(!d.is_reject());
}

#[test]
fn execution_time_while_running_uses_now() {
    let mut d = fresh();
    d.start_time = 1_000;
    assert_eq!(d.execution_time_nanos(1_500), 500);
}

#[test]
fn execution_time_after_stop_ignores_now() {
    let mut d = fresh();
    d.start_time = 1_000;
    d.stop_time = 1_400;
    assert_eq!(d.execution_time_nanos(9_999_999), 400);
}

#[test]
fn execution_time_before_start_is_zero() {
    let d = fresh();
    assert_eq!(d.execution_time_nanos(5_000), 0);
}

#[test]
fn is_slow_requires_limit_and_overrun() {
    let mut d = fresh();
    d.start_time = 0;
    d.time_limit_ms = 50;
    d.stop_time = 50_000_000_000; // would be "slow" but never started
    assert!(!d.is_slow(0));

    d.start_time = 1;
    d.stop_time = 1 + 120_000_000; // 120ms
    assert!(d.is_slow(0));

    d.stop_time = 1 + 30_000_000; // 30ms, within 50ms limit
    assert!(!d.is_slow(0));
}

#[test]
fn is_slow_false_without_limit() {
    let mut d = fresh();
    d.start_time = 1;
    d.stop_time = 1 + 999_000_000_000;
    assert!(!d.is_slow(0));
}

#[test]
fn iterations_per_second_zero_when_no_time_elapsed() {
    let d = fresh();
    assert_eq!(d.iterations_per_second(0), 0.0);
}

#[test]
fn iterations_per_second_computed() {
    let mut d = fresh();
    d.start_time = 0;
    d.stop_time = 0;
    d.start_time = 1;
    d.stop_time = 1 + 2_000_000_000; // 2 seconds
    d.current_iteration = 10;
    assert!((d.iterations_per_second(0) - 5.0).abs() < 1e-9);
}

#[test]
fn full_id_without_operation() {
    let d = fresh();
    assert_eq!(d.full_id(), "orders.import#1");
}

#[test]
fn full_id_with_operation() {
    let mut d = fresh();
    d.operation = Some("validate".to_string());
    assert_eq!(d.full_id(), "orders.import/validate#1");
}
