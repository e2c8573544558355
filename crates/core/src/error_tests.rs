// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn missing_sink_message_names_the_category() {
    let err = MeterError::MissingSink("orders.import".to_string());
    assert_eq!(err.to_string(), "no sink configured for category `orders.import`");
}

#[test]
fn codec_error_wraps_and_forwards_display() {
    let err: MeterError = CodecError::MissingPosition.into();
    assert!(err.to_string().contains("position"));
}
