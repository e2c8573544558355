// SPDX-License-Identifier: MIT

//! Demo CLI driving `meter-core` through a sample instrumented operation.
//!
//! Wires up the `tracing`-backed [`TracingSink`] on both channels, runs a
//! small simulated import job through the Meter lifecycle (iterations,
//! throttled progress, a slow-OK termination), then a failing sub-operation
//! through the `call` wrapper — enough to see every lifecycle marker land on
//! stderr in one run.

use meter_core::sink::SinkPair;
use meter_core::wrappers::call;
use meter_core::{Meter, TracingSink};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
enum ImportError {
    #[error("row {row} failed validation: {reason}")]
    Validation { row: u64, reason: String },
}

fn sink_pair() -> SinkPair {
    SinkPair::new(Arc::new(TracingSink::message()), Arc::new(TracingSink::data()))
}

fn run_import(total_rows: u64) {
    let meter = Meter::new(sink_pair(), "orders.import", None);
    meter.m("nightly batch import").iterations(total_rows).limit_ms(50);
    meter.start();

    for row in 1..=total_rows {
        // Simulate work so the slow-OK path below has something to exceed.
        thread::sleep(Duration::from_millis(20));
        meter.inc();
        meter.progress();
        meter.ctx("row", row.to_string());
    }

    meter.ok();
}

fn validate_row(row: u64) -> Result<u64, ImportError> {
    if row % 2 == 0 {
        Err(ImportError::Validation { row, reason: "even rows are rejected in this demo".to_string() })
    } else {
        Ok(row)
    }
}

fn run_validation_sub_operation(parent: &Meter) {
    let sub = parent.sub("validate");
    let _: Result<u64, ImportError> = call(&sub, || validate_row(2));
}

fn main() {
    tracing_subscriber::fmt().with_target(true).init();

    run_import(3);

    let parent = Meter::new(sink_pair(), "orders.import", Some("batch".to_string()));
    parent.start();
    run_validation_sub_operation(&parent);
    parent.ok();
}
