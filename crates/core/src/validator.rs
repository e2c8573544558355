// SPDX-License-Identifier: MIT

//! The MeterValidator decision table (spec.md §4.5): a pure function
//! classifying every state-affecting call against the Meter's current
//! lifecycle state, returning a resilience [`Tier`] and, for anything short
//! of a clean apply, the diagnostic [`Marker`] to attach. Never panics, never
//! consults the clock or any sink — [`classify`] is a plain data function so
//! it can be exhaustively table-tested.

use crate::marker::Marker;

/// The lifecycle state of a Meter at the moment a call is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Created,
    Started,
    Stopped,
}

/// One state-affecting call, carrying just enough of its arguments to judge
/// validity. `IncTo` carries both the requested value and the Meter's
/// current iteration count so the table can enforce `n > current`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Start,
    SetIterations(u64),
    SetLimitMs(u64),
    SetMessage,
    SetContext,
    UnsetContext,
    SetPath(Option<String>),
    Inc,
    IncBy(u64),
    IncTo { requested: u64, current: u64 },
    Progress,
    Ok(Option<String>),
    Reject(Option<String>),
    Fail(Option<String>),
    Close,
}

/// The four-tier resilience classification (spec.md GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Valid, state-changing: the call proceeds exactly as requested.
    Apply,
    /// Valid, non-state-changing: a setter or progress call that mutates
    /// auxiliary fields without moving `Created`/`Started`/`Stopped`.
    ApplyNonChanging,
    /// Invalid but the core applies a corrective change anyway, flagged by
    /// a diagnostic (e.g. re-`start`ing an already-started Meter).
    ApplyCorrecting,
    /// The call is dropped entirely; a diagnostic is emitted unless `marker`
    /// is `None` (the silent already-stopped `close` no-op).
    Ignore,
}

/// The classification result: what to do, and (outside of a clean `Apply`)
/// which marker names the diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub tier: Tier,
    pub marker: Option<Marker>,
}

impl Verdict {
    fn apply() -> Self {
        Verdict { tier: Tier::Apply, marker: None }
    }

    fn apply_non_changing() -> Self {
        Verdict { tier: Tier::ApplyNonChanging, marker: None }
    }

    fn apply_correcting(marker: Marker) -> Self {
        Verdict { tier: Tier::ApplyCorrecting, marker: Some(marker) }
    }

    fn ignore(marker: Marker) -> Self {
        Verdict { tier: Tier::Ignore, marker: Some(marker) }
    }

    fn ignore_silent() -> Self {
        Verdict { tier: Tier::Ignore, marker: None }
    }
}

/// Classify `call` against a Meter currently in `state`. Pure: same inputs,
/// same output, always.
pub fn classify(state: State, call: &Call) -> Verdict {
    use Call::*;
    use Marker::*;
    use State::*;

    match (state, call) {
        (Created, Start) => Verdict::apply(),
        (Created, SetIterations(n)) if *n > 0 => Verdict::apply_non_changing(),
        (Created, SetIterations(_)) => Verdict::ignore(Illegal),
        (Created, SetLimitMs(n)) if *n > 0 => Verdict::apply_non_changing(),
        (Created, SetLimitMs(_)) => Verdict::ignore(Illegal),
        (Created, SetMessage) => Verdict::apply_non_changing(),
        (Created, SetContext) => Verdict::apply_non_changing(),
        (Created, UnsetContext) => Verdict::apply_non_changing(),
        (Created, SetPath(_)) => Verdict::ignore(Illegal),
        (Created, Inc) | (Created, IncBy(_)) | (Created, IncTo { .. }) => {
            Verdict::ignore(InconsistentIncrement)
        }
        (Created, Progress) => Verdict::ignore(InconsistentProgress),
        (Created, Ok(_)) => Verdict::apply_correcting(InconsistentOk),
        (Created, Reject(_)) => Verdict::apply_correcting(InconsistentReject),
        (Created, Fail(_)) => Verdict::apply_correcting(InconsistentFail),
        (Created, Close) => Verdict::apply_correcting(InconsistentClose),

        (Started, Start) => Verdict::apply_correcting(InconsistentStart),
        (Started, Inc) => Verdict::apply_non_changing(),
        (Started, IncBy(n)) if *n > 0 => Verdict::apply_non_changing(),
        (Started, IncBy(_)) => Verdict::ignore(Illegal),
        (Started, IncTo { requested, current }) if *requested > *current => {
            Verdict::apply_non_changing()
        }
        (Started, IncTo { .. }) => Verdict::ignore(Illegal),
        (Started, SetIterations(n)) if *n > 0 => Verdict::apply_non_changing(),
        (Started, SetIterations(_)) => Verdict::ignore(Illegal),
        (Started, SetLimitMs(n)) if *n > 0 => Verdict::apply_non_changing(),
        (Started, SetLimitMs(_)) => Verdict::ignore(Illegal),
        (Started, SetPath(Some(_))) => Verdict::apply_non_changing(),
        (Started, SetPath(None)) => Verdict::ignore(Illegal),
        (Started, SetMessage) => Verdict::apply_non_changing(),
        (Started, SetContext) => Verdict::apply_non_changing(),
        (Started, UnsetContext) => Verdict::apply_non_changing(),
        (Started, Progress) => Verdict::apply_non_changing(),
        (Started, Ok(_)) => Verdict::apply(),
        (Started, Reject(Some(_))) => Verdict::apply(),
        (Started, Reject(None)) => Verdict::ignore(Illegal),
        (Started, Fail(Some(_))) => Verdict::apply(),
        (Started, Fail(None)) => Verdict::ignore(Illegal),
        (Started, Close) => Verdict::apply(),

        (Stopped, Start) => Verdict::ignore(InconsistentStart),
        (Stopped, Ok(_)) => Verdict::ignore(InconsistentOk),
        (Stopped, Reject(_)) => Verdict::ignore(InconsistentReject),
        (Stopped, Fail(_)) => Verdict::ignore(InconsistentFail),
        (Stopped, Close) => Verdict::ignore_silent(),
        (Stopped, SetMessage)
        | (Stopped, SetContext)
        | (Stopped, UnsetContext)
        | (Stopped, SetPath(_))
        | (Stopped, SetIterations(_))
        | (Stopped, SetLimitMs(_)) => Verdict::ignore(Illegal),
        (Stopped, Inc) | (Stopped, IncBy(_)) | (Stopped, IncTo { .. }) => {
            Verdict::ignore(InconsistentIncrement)
        }
        (Stopped, Progress) => Verdict::ignore(InconsistentProgress),
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
