// SPDX-License-Identifier: MIT

use super::*;
use std::time::Duration;

#[test]
fn system_clock_returns_increasing_time() {
    let clock = SystemClock;
    let t1 = clock.now_nanos();
    std::thread::sleep(Duration::from_millis(1));
    let t2 = clock.now_nanos();
    assert!(t2 > t1);
}

#[test]
fn system_clock_never_zero() {
    assert!(SystemClock.now_nanos() > 0);
}

#[test]
fn fake_clock_starts_nonzero() {
    let clock = FakeClock::new();
    assert_eq!(clock.now_nanos(), 1);
}

#[test]
fn fake_clock_can_be_advanced() {
    let clock = FakeClock::new();
    let t1 = clock.now_nanos();
    clock.advance_nanos(60_000_000_000);
    let t2 = clock.now_nanos();
    assert_eq!(t2 - t1, 60_000_000_000);
}

#[test]
fn fake_clock_advance_millis() {
    let clock = FakeClock::new();
    let t1 = clock.now_nanos();
    clock.advance_millis(5);
    assert_eq!(clock.now_nanos() - t1, 5_000_000);
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let t1 = clock1.now_nanos();
    clock2.advance_nanos(30_000_000_000);
    let t2 = clock1.now_nanos();
    assert_eq!(t2 - t1, 30_000_000_000);
}

#[test]
fn fake_clock_default() {
    let clock = FakeClock::default();
    assert_eq!(clock.now_nanos(), 1);
}

#[test]
fn fake_clock_set_never_zero() {
    let clock = FakeClock::new();
    clock.set_nanos(0);
    assert_eq!(clock.now_nanos(), 1);
}

#[test]
fn default_clock_is_shared_singleton() {
    let a = default_clock();
    let b = default_clock();
    assert!(Arc::ptr_eq(&a, &b));
}
