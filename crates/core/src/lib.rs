// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! meter-core: operation-lifecycle instrumentation layered on top of a
//! generic structured-logging façade.
//!
//! The [`Meter`](meter::Meter) is the core type: a runtime object modeling
//! one application operation's lifecycle (created → started → terminated as
//! OK / Rejected / Failed), emitting paired human/machine records through an
//! abstract [`LogSink`](sink::LogSink) and enforcing a four-tier resilience
//! policy against misuse (see [`validator`]).

pub mod macros;

pub mod caller_stack;
pub mod cause;
pub mod clock;
pub mod codec;
pub mod config;
pub mod data;
pub mod error;
pub mod formatter;
pub mod marker;
pub mod meter;
pub mod session;
pub mod sink;
pub mod tracing_sink;
pub mod validator;
pub mod wrappers;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use cause::{Cause, Named};
pub use clock::{Clock, FakeClock, SystemClock};
pub use codec::CodecError;
pub use config::{Config, ConfigError};
pub use data::MeterData;
pub use error::MeterError;
pub use marker::Marker;
pub use meter::Meter;
pub use session::Session;
pub use sink::{Level, LogSink, NullSink, SinkPair};
pub use tracing_sink::TracingSink;
pub use wrappers::{call, call_or_reject, call_or_reject_checked, run, run_or_reject, safe_call};
