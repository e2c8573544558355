// SPDX-License-Identifier: MIT

use super::*;

#[derive(Debug)]
struct BoomError;

impl fmt::Display for BoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "boom happened")
    }
}

impl std::error::Error for BoomError {}

enum Outcome {
    Fast,
}

impl Named for Outcome {
    fn canonical_name(&self) -> String {
        match self {
            Outcome::Fast => "Fast".to_string(),
        }
    }
}

#[test]
fn str_cause_path_name_is_literal() {
    let cause: Cause = "validation".into();
    assert_eq!(cause.path_name(), "validation");
    assert_eq!(cause.fail_message(), None);
}

#[test]
fn named_cause_uses_canonical_name() {
    let cause: Cause = (&Outcome::Fast).into();
    assert_eq!(cause.path_name(), "Fast");
}

#[test]
fn error_cause_separates_path_and_message() {
    let err = BoomError;
    let cause = from_error(&err, true);
    assert_eq!(cause.path_name(), "BoomError");
    assert_eq!(cause.fail_message(), Some("boom happened"));
}

#[test]
fn error_cause_fully_qualified_for_fail() {
    let err = BoomError;
    let cause = from_error(&err, false);
    assert!(cause.path_name().ends_with("::BoomError") || cause.path_name() == "BoomError");
}

#[test]
fn display_renders_path_name() {
    let cause: Cause = "fast".into();
    assert_eq!(cause.to_string(), "fast");
}
