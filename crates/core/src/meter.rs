// SPDX-License-Identifier: MIT

//! [`Meter`]: the runtime object modeling one operation's lifecycle
//! (spec.md §4.6).
//!
//! A `Meter` is a cheap handle (`Arc<MeterCore>`) around immutable identity
//! fields and a lock-guarded bundle of mutable ones. Termination
//! (`ok`/`reject`/`fail`/`close`) is the one place multiple threads may
//! race on the same Meter (§5): `stop_time` is a dedicated `AtomicU64`
//! single-writer gate, compare-exchanged from `0`, independent of the
//! `parking_lot::Mutex` guarding the rest of the mutable state. Every other
//! method assumes single-threaded use of one Meter, per the Meter's
//! ownership contract.

use crate::cause::Cause;
use crate::clock::Clock;
use crate::config::Config;
use crate::data::MeterData;
use crate::marker::Marker;
use crate::session::{self, Session};
use crate::sink::{Level, SinkPair};
use crate::validator::{self, Call, State as LifecycleState, Tier};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};

const DEFAULT_PROGRESS_PERIOD_MS: u64 = 2_000;

thread_local! {
    static STACK: RefCell<Vec<Weak<MeterCore>>> = const { RefCell::new(Vec::new()) };
}

#[derive(Default)]
struct MutableState {
    start_time: u64,
    last_progress_time: u64,
    last_progress_iteration: u64,
    description: Option<String>,
    context: IndexMap<String, String>,
    current_iteration: u64,
    expected_iterations: u64,
    time_limit_ms: u64,
    preset_path: Option<String>,
    ok_path: Option<String>,
    reject_path: Option<String>,
    fail_path: Option<String>,
    fail_message: Option<String>,
}

struct MeterCore {
    session_uuid: String,
    position: u64,
    category: String,
    operation: Option<String>,
    parent: Option<String>,
    create_time: u64,
    clock: Arc<dyn Clock>,
    sinks: SinkPair,
    progress_period_ms: u64,
    state: Mutex<MutableState>,
    stop_time: AtomicU64,
}

impl MeterCore {
    fn build_data(&self, state: &MutableState) -> MeterData {
        MeterData {
            session_uuid: self.session_uuid.clone(),
            position: self.position,
            category: self.category.clone(),
            operation: self.operation.clone(),
            parent: self.parent.clone(),
            create_time: self.create_time,
            start_time: state.start_time,
            stop_time: self.stop_time.load(Ordering::SeqCst),
            last_progress_time: state.last_progress_time,
            last_progress_iteration: state.last_progress_iteration,
            description: state.description.clone(),
            context: state.context.clone(),
            current_iteration: state.current_iteration,
            expected_iterations: state.expected_iterations,
            time_limit_ms: state.time_limit_ms,
            ok_path: state.ok_path.clone(),
            reject_path: state.reject_path.clone(),
            fail_path: state.fail_path.clone(),
            fail_message: state.fail_message.clone(),
        }
    }

    fn full_id(&self) -> String {
        session::full_id(&self.category, self.operation.as_deref(), self.position)
    }
}

impl Drop for MeterCore {
    fn drop(&mut self) {
        let started = self.state.get_mut().start_time != 0;
        let stopped = self.stop_time.load(Ordering::SeqCst) != 0;
        if started && !stopped && self.sinks.message.enabled(Level::Error) {
            let stack = crate::caller_stack::CallerStack::capture();
            let text = format!("{} dropped while started but never terminated", self.full_id());
            self.sinks.message.emit(Level::Error, Marker::InconsistentFinalized, &text, Some(&stack));
        }
    }
}

/// A handle to one operation's lifecycle. Cloning a `Meter` clones the
/// handle, not the operation — all clones observe and mutate the same
/// underlying state.
#[derive(Clone)]
pub struct Meter(Arc<MeterCore>);

impl Meter {
    /// Construct a Meter bound to `category` (and optional sub-operation),
    /// using the process-wide clock and the default progress period.
    /// `parent` is inferred from the calling thread's current Meter, if any.
    pub fn new(sinks: SinkPair, category: impl Into<String>, operation: Option<String>) -> Meter {
        Self::with_clock(sinks, category, operation, crate::clock::default_clock())
    }

    /// Like [`Meter::new`], with an injected clock (tests use [`crate::clock::FakeClock`]).
    pub fn with_clock(
        sinks: SinkPair,
        category: impl Into<String>,
        operation: Option<String>,
        clock: Arc<dyn Clock>,
    ) -> Meter {
        Self::with_clock_and_period(sinks, category, operation, clock, DEFAULT_PROGRESS_PERIOD_MS)
    }

    /// Like [`Meter::new`], reading `meter.progress.period` from `config`.
    pub fn with_config(
        sinks: SinkPair,
        category: impl Into<String>,
        operation: Option<String>,
        clock: Arc<dyn Clock>,
        config: &Config,
    ) -> Meter {
        let period_ms = config.progress_period.as_millis().min(u128::from(u64::MAX)) as u64;
        Self::with_clock_and_period(sinks, category, operation, clock, period_ms)
    }

    /// Fallible constructor for call sites migrating from an optional/nullable
    /// sink reference: rejects a missing sink as the only precondition error
    /// (spec.md §7), where [`Meter::new`]'s non-optional [`SinkPair`] makes
    /// that state unrepresentable.
    pub fn try_new(
        sinks: Option<SinkPair>,
        category: impl Into<String>,
        operation: Option<String>,
    ) -> Result<Meter, crate::error::MeterError> {
        let category = category.into();
        match sinks {
            Some(sinks) => Ok(Meter::new(sinks, category, operation)),
            None => Err(crate::error::MeterError::MissingSink(category)),
        }
    }

    fn with_clock_and_period(
        sinks: SinkPair,
        category: impl Into<String>,
        operation: Option<String>,
        clock: Arc<dyn Clock>,
        progress_period_ms: u64,
    ) -> Meter {
        Self::with_parent(sinks, category, operation, clock, progress_period_ms, peek_current_full_id())
    }

    /// Like [`Meter::with_clock_and_period`], with an explicit `parent`
    /// rather than one inferred from the thread-local stack. [`Meter::sub`]
    /// uses this to set `parent` to `self.full_id()` unconditionally,
    /// regardless of what (if anything) is current on the calling thread.
    fn with_parent(
        sinks: SinkPair,
        category: impl Into<String>,
        operation: Option<String>,
        clock: Arc<dyn Clock>,
        progress_period_ms: u64,
        parent: Option<String>,
    ) -> Meter {
        let category = category.into();
        let now = clock.now_nanos();
        let position_key = session::position_key(&category, operation.as_deref());
        let position = Session::process().next_position(&position_key);

        Meter(Arc::new(MeterCore {
            session_uuid: Session::process().uuid().to_string(),
            position,
            category,
            operation,
            parent,
            create_time: now,
            clock,
            sinks,
            progress_period_ms,
            state: Mutex::new(MutableState::default()),
            stop_time: AtomicU64::new(0),
        }))
    }

    /// The process-wide sentinel returned by [`Meter::current`] when no
    /// Meter is active on the calling thread. Fully inert: bound to
    /// no-op sinks, so every call on it is safe but produces no records.
    pub fn noop() -> Meter {
        static NOOP: OnceLock<Meter> = OnceLock::new();
        NOOP.get_or_init(|| {
            Meter(Arc::new(MeterCore {
                session_uuid: String::new(),
                position: 0,
                category: "noop".to_string(),
                operation: None,
                parent: None,
                create_time: 1,
                clock: crate::clock::default_clock(),
                sinks: SinkPair::noop(),
                progress_period_ms: DEFAULT_PROGRESS_PERIOD_MS,
                state: Mutex::new(MutableState::default()),
                stop_time: AtomicU64::new(1),
            }))
        })
        .clone()
    }

    /// The thread-local top-of-stack Meter, or [`Meter::noop`] if none is
    /// active on this thread.
    pub fn current() -> Meter {
        STACK.with(|cell| {
            let mut stack = cell.borrow_mut();
            while let Some(weak) = stack.last() {
                if let Some(core) = weak.upgrade() {
                    return Meter(core);
                }
                stack.pop();
            }
            Meter::noop()
        })
    }

    /// Derive a sub-operation Meter: same sink pair and category, operation
    /// composed as `"{parent_operation?/}{name}"`, `parent` set to
    /// `self.full_id()`. Per SPEC_FULL.md, a sub-Meter does **not** inherit
    /// description, context, or iteration count — only identity and sinks.
    pub fn sub(&self, name: impl Into<String>) -> Meter {
        let name = name.into();
        let operation = match &self.0.operation {
            Some(op) => format!("{op}/{name}"),
            None => name,
        };
        Meter::with_parent(
            self.0.sinks.clone(),
            self.0.category.clone(),
            Some(operation),
            self.0.clock.clone(),
            self.0.progress_period_ms,
            Some(self.0.full_id()),
        )
    }

    /// `"{category}#{position}"` or `"{category}/{operation}#{position}"`.
    pub fn full_id(&self) -> String {
        self.0.full_id()
    }

    /// Coerce a path/cause argument to its canonical string without
    /// attaching it to a Meter — exposed for callers building their own
    /// diagnostic text (SPEC_FULL.md Supplemented Feature #4).
    pub fn path_of(cause: impl Into<Cause>) -> String {
        cause.into().path_name().to_string()
    }

    /// A snapshot of this Meter's current semantic state.
    pub fn data(&self) -> MeterData {
        self.0.build_data(&self.0.state.lock())
    }

    fn lifecycle_state(&self) -> LifecycleState {
        if self.0.stop_time.load(Ordering::SeqCst) != 0 {
            LifecycleState::Stopped
        } else if self.0.state.lock().start_time != 0 {
            LifecycleState::Started
        } else {
            LifecycleState::Created
        }
    }

    fn emit_diagnostic(&self, marker: Marker, detail: &str) {
        if self.0.sinks.message.enabled(Level::Error) {
            let stack = crate::caller_stack::CallerStack::capture();
            let text = format!("{} {detail}", self.0.full_id());
            self.0.sinks.message.emit(Level::Error, marker, &text, Some(&stack));
        }
    }

    fn snapshot_and_clear_context(&self) -> MeterData {
        let mut state = self.0.state.lock();
        let snapshot = self.0.build_data(&state);
        state.context.clear();
        snapshot
    }

    fn emit_with_snapshot(
        &self,
        snapshot: &MeterData,
        msg_level: Level,
        msg_marker: Marker,
        data_level: Level,
        data_marker: Marker,
    ) {
        let now = self.0.clock.now_nanos();
        if self.0.sinks.message.enabled(msg_level) {
            let text = crate::formatter::format_message(snapshot, msg_marker, now);
            self.0.sinks.message.emit(msg_level, msg_marker, &text, None);
        }
        if self.0.sinks.data.enabled(data_level) {
            let text = crate::codec::serialize(snapshot);
            self.0.sinks.data.emit(data_level, data_marker, &text, None);
        }
    }

    fn emit_lifecycle(&self, msg_level: Level, msg_marker: Marker, data_level: Level, data_marker: Marker) {
        let snapshot = self.snapshot_and_clear_context();
        self.emit_with_snapshot(&snapshot, msg_level, msg_marker, data_level, data_marker);
    }

    fn apply_setter(&self, call: Call, apply: impl FnOnce(&mut MutableState), detail: &str) -> Meter {
        let verdict = validator::classify(self.lifecycle_state(), &call);
        match verdict.tier {
            Tier::Apply | Tier::ApplyNonChanging | Tier::ApplyCorrecting => {
                apply(&mut self.0.state.lock());
            }
            Tier::Ignore => {
                if let Some(marker) = verdict.marker {
                    self.emit_diagnostic(marker, detail);
                }
            }
        }
        self.clone()
    }

    // -- setters --------------------------------------------------------

    /// Set the human-readable description shown on the message channel.
    pub fn m(&self, message: impl Into<String>) -> Meter {
        let message = message.into();
        self.apply_setter(Call::SetMessage, move |state| state.description = Some(message), "m() ignored: Meter already stopped")
    }

    /// Set one context entry, overwriting any prior value for `key`.
    pub fn ctx(&self, key: impl Into<String>, value: impl Into<String>) -> Meter {
        let key = key.into();
        let value = value.into();
        self.apply_setter(
            Call::SetContext,
            move |state| {
                state.context.insert(key, value);
            },
            "ctx() ignored: Meter already stopped",
        )
    }

    /// Set one context entry to the null rendering (`<null>` in the codec).
    pub fn ctx_null(&self, key: impl Into<String>) -> Meter {
        let key = key.into();
        self.apply_setter(
            Call::SetContext,
            move |state| {
                state.context.insert(key, String::new());
            },
            "ctx() ignored: Meter already stopped",
        )
    }

    /// Remove one context entry.
    pub fn unctx(&self, key: &str) -> Meter {
        let key = key.to_string();
        self.apply_setter(
            Call::UnsetContext,
            move |state| {
                state.context.shift_remove(&key);
            },
            "unctx() ignored: Meter already stopped",
        )
    }

    /// Set the expected iteration count (`0` means unknown).
    pub fn iterations(&self, n: u64) -> Meter {
        self.apply_setter(Call::SetIterations(n), move |state| state.expected_iterations = n, "iterations() ignored")
    }

    /// Set the advisory slow-execution deadline in milliseconds (`0` = no limit).
    pub fn limit_ms(&self, n: u64) -> Meter {
        self.apply_setter(Call::SetLimitMs(n), move |state| state.time_limit_ms = n, "limit_ms() ignored")
    }

    /// Preset the outcome path used by a subsequent no-argument [`Meter::ok`].
    pub fn path(&self, id: impl Into<Cause>) -> Meter {
        let name = id.into().path_name().to_string();
        self.apply_setter(Call::SetPath(Some(name.clone())), move |state| state.preset_path = Some(name), "path() ignored")
    }

    // -- progress/iteration ----------------------------------------------

    pub fn inc(&self) -> Meter {
        self.inc_by(1)
    }

    pub fn inc_by(&self, n: u64) -> Meter {
        let verdict = validator::classify(self.lifecycle_state(), &Call::IncBy(n));
        match verdict.tier {
            Tier::ApplyNonChanging | Tier::Apply | Tier::ApplyCorrecting => {
                let mut state = self.0.state.lock();
                state.current_iteration = state.current_iteration.saturating_add(n);
            }
            Tier::Ignore => {
                if let Some(marker) = verdict.marker {
                    self.emit_diagnostic(marker, "inc_by() ignored");
                }
            }
        }
        self.clone()
    }

    pub fn inc_to(&self, n: u64) -> Meter {
        let current = self.0.state.lock().current_iteration;
        let verdict = validator::classify(self.lifecycle_state(), &Call::IncTo { requested: n, current });
        match verdict.tier {
            Tier::ApplyNonChanging | Tier::Apply | Tier::ApplyCorrecting => {
                self.0.state.lock().current_iteration = n;
            }
            Tier::Ignore => {
                if let Some(marker) = verdict.marker {
                    self.emit_diagnostic(marker, "inc_to() ignored");
                }
            }
        }
        self.clone()
    }

    /// Emit a PROGRESS event, subject to throttling: only when
    /// `current_iteration` has advanced since the last emission and the
    /// configured progress period has elapsed since then.
    pub fn progress(&self) -> Meter {
        let verdict = validator::classify(self.lifecycle_state(), &Call::Progress);
        match verdict.tier {
            Tier::ApplyNonChanging => {
                let now = self.0.clock.now_nanos();
                let should_emit = {
                    let mut state = self.0.state.lock();
                    let advanced = state.current_iteration > state.last_progress_iteration;
                    let elapsed_ms = now.saturating_sub(state.last_progress_time) / 1_000_000;
                    if advanced && elapsed_ms > self.0.progress_period_ms {
                        state.last_progress_iteration = state.current_iteration;
                        state.last_progress_time = now;
                        true
                    } else {
                        false
                    }
                };
                if should_emit {
                    self.emit_lifecycle(Level::Info, Marker::MsgProgress, Level::Trace, Marker::DataProgress);
                }
            }
            Tier::Ignore => {
                if let Some(marker) = verdict.marker {
                    self.emit_diagnostic(marker, "progress() ignored: Meter not started");
                }
            }
            _ => {}
        }
        self.clone()
    }

    // -- lifecycle --------------------------------------------------------

    /// Transition to started, emitting START. Calling `start` on an
    /// already-started Meter resets `start_time` and emits
    /// `INCONSISTENT_START` before re-emitting START (tier-3 state-correcting,
    /// spec.md §4.5).
    pub fn start(&self) -> Meter {
        let verdict = validator::classify(self.lifecycle_state(), &Call::Start);
        let now = self.0.clock.now_nanos();
        match verdict.tier {
            Tier::Apply => {
                {
                    let mut state = self.0.state.lock();
                    state.start_time = now;
                    state.last_progress_time = now;
                }
                push_current(&self.0);
                self.emit_lifecycle(Level::Debug, Marker::MsgStart, Level::Trace, Marker::DataStart);
            }
            Tier::ApplyCorrecting => {
                if let Some(marker) = verdict.marker {
                    self.emit_diagnostic(marker, "start() called on an already-started Meter");
                }
                {
                    let mut state = self.0.state.lock();
                    state.start_time = now;
                    state.last_progress_time = now;
                }
                self.emit_lifecycle(Level::Debug, Marker::MsgStart, Level::Trace, Marker::DataStart);
            }
            Tier::Ignore => {
                if let Some(marker) = verdict.marker {
                    self.emit_diagnostic(marker, "start() ignored: Meter already terminated");
                }
            }
            Tier::ApplyNonChanging => {}
        }
        self.clone()
    }

    /// Terminate as OK, using any path preset via [`Meter::path`].
    pub fn ok(&self) -> Meter {
        let preset = self.0.state.lock().preset_path.clone();
        self.terminate(Marker::InconsistentOk, move |state| state.ok_path = preset)
    }

    /// Terminate as OK with an explicit path.
    pub fn ok_with(&self, path: impl Into<Cause>) -> Meter {
        let name = path.into().path_name().to_string();
        self.terminate(Marker::InconsistentOk, move |state| state.ok_path = Some(name))
    }

    /// Terminate as REJECT.
    pub fn reject(&self, cause: impl Into<Cause>) -> Meter {
        let cause = cause.into();
        let path = cause.path_name().to_string();
        self.terminate(Marker::InconsistentReject, move |state| state.reject_path = Some(path))
    }

    /// Terminate as FAIL, capturing both the path and, for [`Cause::Error`],
    /// the separate failure message.
    pub fn fail(&self, cause: impl Into<Cause>) -> Meter {
        let cause = cause.into();
        let path = cause.path_name().to_string();
        let message = cause.fail_message().map(str::to_string);
        self.terminate(Marker::InconsistentFail, move |state| {
            state.fail_path = Some(path);
            state.fail_message = message;
        })
    }

    /// `close`: if already stopped, a silent no-op. If never started,
    /// auto-initializes `start_time` and terminates as
    /// `fail("try-with-resources")` with `INCONSISTENT_CLOSE`. If started,
    /// terminates as `fail("try-with-resources")` with no diagnostic — this
    /// is the ordinary scope-guard path (spec.md §4.5 "close semantics").
    pub fn close(&self) -> Meter {
        if self.0.stop_time.load(Ordering::SeqCst) != 0 {
            return self.clone();
        }
        self.terminate(Marker::InconsistentClose, |state| {
            state.fail_path = Some("try-with-resources".to_string());
        })
    }

    /// Shared termination path: attempts the `stop_time` CAS (the single
    /// first-termination-wins gate), then applies `apply_outcome` and
    /// emits the matching terminal event. `diagnostic_marker` names the
    /// marker used both when this call loses the CAS race (already
    /// stopped) and when it wins from the `Created` state (never started).
    fn terminate(&self, diagnostic_marker: Marker, apply_outcome: impl FnOnce(&mut MutableState)) -> Meter {
        let now = self.0.clock.now_nanos();
        let was_started = self.0.state.lock().start_time != 0;

        let won = self.0.stop_time.compare_exchange(0, now, Ordering::SeqCst, Ordering::SeqCst).is_ok();
        if !won {
            self.emit_diagnostic(diagnostic_marker, "terminator ignored: Meter already stopped");
            return self.clone();
        }

        let auto_started = !was_started;
        {
            let mut state = self.0.state.lock();
            if auto_started {
                state.start_time = now;
            }
            apply_outcome(&mut state);
        }
        if auto_started {
            self.emit_diagnostic(diagnostic_marker, "terminator called before start(); start_time auto-initialized");
        }

        self.emit_terminal_event();

        if !pop_current(&self.0) {
            self.emit_diagnostic(Marker::Bug, "thread-local Meter stack was not restored cleanly at termination");
        }

        self.clone()
    }

    fn emit_terminal_event(&self) {
        let snapshot = self.snapshot_and_clear_context();
        if snapshot.is_fail() {
            self.emit_with_snapshot(&snapshot, Level::Error, Marker::MsgFail, Level::Trace, Marker::DataFail);
        } else if snapshot.is_reject() {
            self.emit_with_snapshot(&snapshot, Level::Info, Marker::MsgReject, Level::Trace, Marker::DataReject);
        } else {
            let now = self.0.clock.now_nanos();
            if snapshot.is_slow(now) {
                self.emit_with_snapshot(&snapshot, Level::Warn, Marker::MsgSlowOk, Level::Trace, Marker::DataSlowOk);
            } else {
                self.emit_with_snapshot(&snapshot, Level::Info, Marker::MsgOk, Level::Trace, Marker::DataOk);
            }
        }
    }
}

/// Peek the full id of the thread-local top Meter, if one is active,
/// without mutating the stack. Used to infer `parent` at construction time.
fn peek_current_full_id() -> Option<String> {
    STACK.with(|cell| {
        let stack = cell.borrow();
        stack.iter().rev().find_map(|weak| weak.upgrade()).map(|core| core.full_id())
    })
}

fn push_current(core: &Arc<MeterCore>) {
    STACK.with(|cell| cell.borrow_mut().push(Arc::downgrade(core)));
}

/// Remove `core` from the thread-local stack. Returns `true` if it was
/// exactly the top entry (the expected, well-nested case); `false` if it
/// had to be found deeper in the stack (concurrent/misused nesting).
fn pop_current(core: &Arc<MeterCore>) -> bool {
    STACK.with(|cell| {
        let mut stack = cell.borrow_mut();
        match stack.last().and_then(Weak::upgrade) {
            Some(top) if Arc::ptr_eq(&top, core) => {
                stack.pop();
                true
            }
            _ => {
                let before = stack.len();
                stack.retain(|weak| weak.upgrade().map(|arc| !Arc::ptr_eq(&arc, core)).unwrap_or(true));
                stack.len() == before
            }
        }
    })
}

#[cfg(test)]
#[path = "meter_tests.rs"]
mod tests;
