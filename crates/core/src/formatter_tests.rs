// SPDX-License-Identifier: MIT

use super::*;
use yare::parameterized;

#[parameterized(
    nanoseconds = { 500, "500ns" },
    microseconds = { 2_500, "2.50us" },
    milliseconds = { 4_200_000, "4.20ms" },
    seconds = { 3_000_000_000, "3.00s" },
    minutes = { 120_000_000_000, "2.00m" },
    hours = { 7_200_000_000_000, "2.00h" },
)]
fn duration_units_adapt_to_magnitude(nanos: u64, expected: &str) {
    assert_eq!(format_duration_nanos(nanos), expected);
}

#[parameterized(
    below_thousand = { 42, "42" },
    thousands = { 4_200, "4.2k" },
    millions = { 2_500_000, "2.5M" },
)]
fn count_units_adapt_to_magnitude(n: u64, expected: &str) {
    assert_eq!(format_count(n), expected);
}

#[parameterized(
    bytes = { 512, "512B" },
    kilobytes = { 2048, "2.00kB" },
    megabytes = { 5 * 1024 * 1024, "5.00MB" },
    gigabytes = { 3 * 1024 * 1024 * 1024, "3.00GB" },
)]
fn byte_units_adapt_to_magnitude(n: u64, expected: &str) {
    assert_eq!(format_bytes(n), expected);
}

fn sample() -> MeterData {
    MeterData {
        session_uuid: "aB3xQ9pL".to_string(),
        position: 17,
        category: "orders.import".to_string(),
        operation: Some("validate".to_string()),
        start_time: 1_000,
        current_iteration: 42,
        expected_iterations: 100,
        ..Default::default()
    }
}

#[test]
fn message_includes_full_id_and_progress() {
    let data = sample();
    let text = format_message(&data, Marker::MsgProgress, 1_000 + 2_000_000_000);
    assert!(text.starts_with("orders.import/validate#17"));
    assert!(text.contains("42/100"));
    assert!(text.contains("2.00s"));
}

#[test]
fn message_includes_description() {
    let mut data = sample();
    data.description = Some("importing batch".to_string());
    let text = format_message(&data, Marker::MsgProgress, 1_000);
    assert!(text.contains("- importing batch"));
}

#[test]
fn ok_message_includes_path() {
    let mut data = sample();
    data.stop_time = 1_000 + 500_000_000;
    data.ok_path = Some("fast".to_string());
    let text = format_message(&data, Marker::MsgOk, 0);
    assert!(text.contains("ok=fast"));
}

#[test]
fn fail_message_includes_path_and_detail() {
    let mut data = sample();
    data.stop_time = 1_000 + 500_000_000;
    data.fail_path = Some("Boom".to_string());
    data.fail_message = Some("kaboom".to_string());
    let text = format_message(&data, Marker::MsgFail, 0);
    assert!(text.contains("fail=Boom: kaboom"));
}

#[test]
fn message_includes_context_delta() {
    let mut data = sample();
    data.context.insert("userId".to_string(), "u1".to_string());
    let text = format_message(&data, Marker::MsgProgress, 1_000);
    assert!(text.contains("context={userId:\"u1\"}"));
}

#[test]
fn message_before_start_omits_timing_block() {
    let mut data = sample();
    data.start_time = 0;
    data.current_iteration = 0;
    data.expected_iterations = 0;
    let text = format_message(&data, Marker::MsgStart, 0);
    assert_eq!(text, "orders.import/validate#17");
}
