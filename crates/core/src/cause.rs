// SPDX-License-Identifier: MIT

//! The sum type backing `ok(path)` / `reject(cause)` / `fail(cause)` arguments.
//!
//! Source languages with dynamic typing accept "a string, an enum constant,
//! or an exception" interchangeably for these arguments. Rust needs a real
//! type: [`Cause`] plus a conversion trait so call sites can pass whichever
//! shape they have on hand.

use std::fmt;

/// A coerced outcome path/cause, as described in spec.md §4.6 "Path
/// encoding". Each variant renders to a canonical string via
/// [`Cause::path_name`]; [`Cause::Error`] additionally carries a separate
/// message used to populate `fail_message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cause {
    /// A caller-supplied string, used as-is.
    Str(String),
    /// An enum-like value; canonical name only (no message).
    Named(String),
    /// An error value: type name (for the path) plus its display message.
    Error { type_name: String, message: String },
    /// Anything else, rendered via its own textual representation.
    Other(String),
}

impl Cause {
    /// The short name that becomes `ok_path` / `reject_path` / `fail_path`.
    ///
    /// For [`Cause::Error`], callers choose whether to use the simple name
    /// (OK/REJECT) or reserve the fully-qualified name (FAIL) before
    /// constructing this value — `type_name` already holds whichever the
    /// caller decided on.
    pub fn path_name(&self) -> &str {
        match self {
            Cause::Str(s) => s,
            Cause::Named(s) => s,
            Cause::Error { type_name, .. } => type_name,
            Cause::Other(s) => s,
        }
    }

    /// The separate message field populated only by FAIL termination.
    pub fn fail_message(&self) -> Option<&str> {
        match self {
            Cause::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_name())
    }
}

impl From<&str> for Cause {
    fn from(s: &str) -> Self {
        Cause::Str(s.to_string())
    }
}

impl From<String> for Cause {
    fn from(s: String) -> Self {
        Cause::Str(s)
    }
}

/// A type with a stable, enum-like canonical name (e.g. a domain error
/// enum's variant name), distinct from a general [`std::error::Error`].
pub trait Named {
    fn canonical_name(&self) -> String;
}

impl<T: Named> From<&T> for Cause {
    fn from(value: &T) -> Self {
        Cause::Named(value.canonical_name())
    }
}

/// Build a [`Cause::Error`] from any standard error, choosing the simple
/// type name (for OK/REJECT) or the fully-qualified name (for FAIL) per
/// spec.md §4.6.
pub fn from_error<E: std::error::Error>(err: &E, simple_name: bool) -> Cause {
    let full = std::any::type_name::<E>();
    let type_name = if simple_name {
        full.rsplit("::").next().unwrap_or(full).to_string()
    } else {
        full.to_string()
    };
    Cause::Error { type_name, message: err.to_string() }
}

#[cfg(test)]
#[path = "cause_tests.rs"]
mod tests;
