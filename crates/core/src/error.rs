// SPDX-License-Identifier: MIT

//! [`MeterError`]: the only error type that ever escapes the public API
//! (SPEC_FULL.md A.1). Configuration problems never reach it — those are
//! collected into [`crate::config::ConfigError`] and inspected separately.

use crate::codec::CodecError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeterError {
    #[error("no sink configured for category `{0}`")]
    MissingSink(String),
    #[error("malformed record: {0}")]
    Codec(#[from] CodecError),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
