// SPDX-License-Identifier: MIT

//! The closed set of classification tags attached to every emitted record.
//!
//! Markers route and filter records at the sink; they carry no data of
//! their own.

/// Classification tag attached to every record a [`crate::meter::Meter`]
/// emits, on either the message or the data channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    // message-channel lifecycle
    MsgStart,
    MsgProgress,
    MsgOk,
    MsgSlowOk,
    MsgReject,
    MsgFail,
    // data-channel lifecycle (same events, machine-parsable)
    DataStart,
    DataProgress,
    DataOk,
    DataSlowOk,
    DataReject,
    DataFail,
    // diagnostics
    Bug,
    Illegal,
    InconsistentStart,
    InconsistentIncrement,
    InconsistentProgress,
    InconsistentException,
    InconsistentReject,
    InconsistentOk,
    InconsistentFail,
    InconsistentClose,
    InconsistentFinalized,
}

crate::simple_display! {
    Marker {
        MsgStart => "MSG_START",
        MsgProgress => "MSG_PROGRESS",
        MsgOk => "MSG_OK",
        MsgSlowOk => "MSG_SLOW_OK",
        MsgReject => "MSG_REJECT",
        MsgFail => "MSG_FAIL",
        DataStart => "DATA_START",
        DataProgress => "DATA_PROGRESS",
        DataOk => "DATA_OK",
        DataSlowOk => "DATA_SLOW_OK",
        DataReject => "DATA_REJECT",
        DataFail => "DATA_FAIL",
        Bug => "BUG",
        Illegal => "ILLEGAL",
        InconsistentStart => "INCONSISTENT_START",
        InconsistentIncrement => "INCONSISTENT_INCREMENT",
        InconsistentProgress => "INCONSISTENT_PROGRESS",
        InconsistentException => "INCONSISTENT_EXCEPTION",
        InconsistentReject => "INCONSISTENT_REJECT",
        InconsistentOk => "INCONSISTENT_OK",
        InconsistentFail => "INCONSISTENT_FAIL",
        InconsistentClose => "INCONSISTENT_CLOSE",
        InconsistentFinalized => "INCONSISTENT_FINALIZED",
    }
}

impl Marker {
    /// True for the six `DATA_*` lifecycle markers.
    pub fn is_data(self) -> bool {
        matches!(
            self,
            Marker::DataStart
                | Marker::DataProgress
                | Marker::DataOk
                | Marker::DataSlowOk
                | Marker::DataReject
                | Marker::DataFail
        )
    }

    /// True for any of the eleven diagnostic markers.
    pub fn is_diagnostic(self) -> bool {
        matches!(
            self,
            Marker::Bug
                | Marker::Illegal
                | Marker::InconsistentStart
                | Marker::InconsistentIncrement
                | Marker::InconsistentProgress
                | Marker::InconsistentException
                | Marker::InconsistentReject
                | Marker::InconsistentOk
                | Marker::InconsistentFail
                | Marker::InconsistentClose
                | Marker::InconsistentFinalized
        )
    }
}

#[cfg(test)]
#[path = "marker_tests.rs"]
mod tests;
