// SPDX-License-Identifier: MIT

//! Operation wrappers (spec.md §4.8): adapters that drive `start` →
//! `(ok|reject|fail)` around a caller-supplied unit of work, classifying the
//! outcome and always rethrowing whatever the work produced.
//!
//! Source languages in this domain distinguish a checked exception (an
//! expected, declared failure mode) from an unchecked one (a programming
//! defect surfacing through the call stack). Rust has no such distinction in
//! its type system, so the two map onto the two ways a Rust computation can
//! fail: a returned `Result::Err` is the checked case, an unwinding panic is
//! the unchecked one. `call_or_reject_checked` is the one wrapper that reads
//! both: `Err` → REJECT, panic → FAIL (then the panic keeps unwinding —
//! wrappers never swallow a panic, only record it).
//!
//! Every wrapper calls [`Meter::start`] first. On the happy path, `ok` is
//! only called if the work hasn't already terminated the Meter itself
//! (`!is_stopped`) — an explicit terminal call inside `work` is never
//! overridden. On the error path, the wrapper's own terminal call is applied
//! unconditionally; first-termination-wins (via the `stop_time` CAS) is what
//! actually decides whether it takes effect.

use crate::cause::{from_error, Cause};
use crate::meter::Meter;
use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

fn finish_ok(meter: &Meter) {
    if !meter.data().is_stopped() {
        meter.ok();
    }
}

fn finish_ok_with_result<T: fmt::Debug>(meter: &Meter, value: &T) {
    if !meter.data().is_stopped() {
        meter.ctx("result", format!("{value:?}"));
        meter.ok();
    }
}

/// OK on normal return; FAIL on any returned error. Rethrows.
pub fn run<E: StdError>(meter: &Meter, work: impl FnOnce() -> Result<(), E>) -> Result<(), E> {
    meter.start();
    match work() {
        Ok(()) => {
            finish_ok(meter);
            Ok(())
        }
        Err(err) => {
            meter.fail(from_error(&err, false));
            Err(err)
        }
    }
}

/// REJECT if `is_reject(&err)` holds for the returned error; FAIL otherwise.
/// Rethrows.
pub fn run_or_reject<E: StdError>(
    meter: &Meter,
    work: impl FnOnce() -> Result<(), E>,
    is_reject: impl FnOnce(&E) -> bool,
) -> Result<(), E> {
    meter.start();
    match work() {
        Ok(()) => {
            finish_ok(meter);
            Ok(())
        }
        Err(err) => {
            if is_reject(&err) {
                meter.reject(from_error(&err, true));
            } else {
                meter.fail(from_error(&err, false));
            }
            Err(err)
        }
    }
}

/// Like [`run`], but returns the work's value, recorded under context key
/// `result` before the OK event is emitted.
pub fn call<T: fmt::Debug, E: StdError>(
    meter: &Meter,
    work: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    meter.start();
    match work() {
        Ok(value) => {
            finish_ok_with_result(meter, &value);
            Ok(value)
        }
        Err(err) => {
            meter.fail(from_error(&err, false));
            Err(err)
        }
    }
}

/// Like [`call`], but REJECT when `is_reject(&err)` holds instead of FAIL.
pub fn call_or_reject<T: fmt::Debug, E: StdError>(
    meter: &Meter,
    work: impl FnOnce() -> Result<T, E>,
    is_reject: impl FnOnce(&E) -> bool,
) -> Result<T, E> {
    meter.start();
    match work() {
        Ok(value) => {
            finish_ok_with_result(meter, &value);
            Ok(value)
        }
        Err(err) => {
            if is_reject(&err) {
                meter.reject(from_error(&err, true));
            } else {
                meter.fail(from_error(&err, false));
            }
            Err(err)
        }
    }
}

/// REJECT on a returned (checked/domain) error; FAIL on an unwinding
/// (unchecked/runtime) panic. The panic keeps unwinding after the FAIL event
/// is recorded — this wrapper never converts a panic into a `Result`.
pub fn call_or_reject_checked<T: fmt::Debug, E: StdError>(
    meter: &Meter,
    work: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    meter.start();
    match panic::catch_unwind(AssertUnwindSafe(work)) {
        Ok(Ok(value)) => {
            finish_ok_with_result(meter, &value);
            Ok(value)
        }
        Ok(Err(err)) => {
            meter.reject(from_error(&err, true));
            Err(err)
        }
        Err(payload) => {
            meter.fail(panic_cause(payload.as_ref()));
            panic::resume_unwind(payload);
        }
    }
}

/// FAIL on any error. Unlike the other wrappers, the error is not returned:
/// a checked `Result::Err` is wrapped into a generic unchecked failure and
/// raised as a panic, the same "rethrow as unchecked" the source library
/// performs for its own `safeCall` when the caller signature doesn't admit
/// the checked type.
#[allow(clippy::panic)]
pub fn safe_call<T, E: StdError>(meter: &Meter, work: impl FnOnce() -> Result<T, E>) -> T {
    meter.start();
    match work() {
        Ok(value) => {
            finish_ok(meter);
            value
        }
        Err(err) => {
            meter.fail(from_error(&err, false));
            panic!("{}: {err}", std::any::type_name::<E>());
        }
    }
}

fn panic_cause(payload: &(dyn Any + Send)) -> Cause {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    };
    Cause::Error { type_name: "panic".to_string(), message }
}

#[cfg(test)]
#[path = "wrappers_tests.rs"]
mod tests;
