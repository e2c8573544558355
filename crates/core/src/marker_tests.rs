// SPDX-License-Identifier: MIT

use super::*;

#[yare::parameterized(
    start = { Marker::MsgStart, "MSG_START" },
    progress = { Marker::MsgProgress, "MSG_PROGRESS" },
    ok = { Marker::MsgOk, "MSG_OK" },
    slow_ok = { Marker::MsgSlowOk, "MSG_SLOW_OK" },
    reject = { Marker::MsgReject, "MSG_REJECT" },
    fail = { Marker::MsgFail, "MSG_FAIL" },
    data_start = { Marker::DataStart, "DATA_START" },
    data_ok = { Marker::DataOk, "DATA_OK" },
    bug = { Marker::Bug, "BUG" },
    illegal = { Marker::Illegal, "ILLEGAL" },
    inconsistent_finalized = { Marker::InconsistentFinalized, "INCONSISTENT_FINALIZED" },
)]
fn display_matches_vocabulary(marker: Marker, expected: &str) {
    assert_eq!(marker.to_string(), expected);
}

#[test]
fn is_data_classifies_only_data_markers() {
    assert!(Marker::DataStart.is_data());
    assert!(Marker::DataSlowOk.is_data());
    assert!(!Marker::MsgStart.is_data());
    assert!(!Marker::Bug.is_data());
}

#[test]
fn is_diagnostic_classifies_only_diagnostic_markers() {
    assert!(Marker::Bug.is_diagnostic());
    assert!(Marker::InconsistentOk.is_diagnostic());
    assert!(!Marker::MsgOk.is_diagnostic());
    assert!(!Marker::DataOk.is_diagnostic());
}
