// SPDX-License-Identifier: MIT

use super::*;
use indexmap::IndexMap;

fn sample() -> MeterData {
    let mut context = IndexMap::new();
    context.insert("userId".to_string(), "u1".to_string());
    context.insert("region".to_string(), "eu".to_string());
    MeterData {
        session_uuid: "aB3xQ9pL".to_string(),
        position: 17,
        category: "orders.import".to_string(),
        operation: Some("validate".to_string()),
        create_time: 1000,
        start_time: 1200,
        stop_time: 1800,
        current_iteration: 42,
        expected_iterations: 100,
        ok_path: Some("fast".to_string()),
        context,
        ..Default::default()
    }
}

#[test]
fn serialize_matches_documented_example_shape() {
    let text = serialize(&sample());
    assert!(text.starts_with("{sessionUuid:\"aB3xQ9pL\",position:17,category:\"orders.import\""));
    assert!(text.contains("okPath:\"fast\""));
    assert!(text.contains("context:{userId:\"u1\",region:\"eu\"}"));
    assert!(!text.contains("parent:"));
    assert!(!text.contains("rejectPath:"));
}

#[test]
fn round_trip_full_record() {
    let original = sample();
    let text = serialize(&original);
    let parsed = parse(&text).expect("round-trip parse must succeed");
    assert_eq!(parsed, original);
}

#[test]
fn round_trip_minimal_record() {
    let original = MeterData {
        session_uuid: "xx".to_string(),
        position: 1,
        category: "cat".to_string(),
        ..Default::default()
    };
    let text = serialize(&original);
    let parsed = parse(&text).expect("round-trip parse must succeed");
    assert_eq!(parsed, original);
}

#[test]
fn parse_tolerates_whitespace() {
    let text = r#"{ sessionUuid : "abc" , position : 1 , category : "cat" }"#;
    let parsed = parse(text).expect("tolerant parse must succeed");
    assert_eq!(parsed.session_uuid, "abc");
    assert_eq!(parsed.position, 1);
}

#[test]
fn parse_ignores_unknown_keys() {
    let text = r#"{sessionUuid:"abc",position:1,category:"cat",bogus:"ignored"}"#;
    let parsed = parse(text).expect("unknown keys are ignored");
    assert_eq!(parsed.category, "cat");
}

#[test]
fn parse_rejects_missing_session_uuid() {
    let text = r#"{position:1,category:"cat"}"#;
    assert_eq!(parse(text), Err(CodecError::MissingSessionUuid));
}

#[test]
fn parse_rejects_missing_position() {
    let text = r#"{sessionUuid:"abc",category:"cat"}"#;
    assert_eq!(parse(text), Err(CodecError::MissingPosition));
}

#[test]
fn parse_rejects_non_object() {
    assert!(matches!(parse("not an object"), Err(CodecError::NotAnObject(_))));
}

#[test]
fn context_null_values_round_trip_as_empty_string() {
    let mut context = IndexMap::new();
    context.insert("missing".to_string(), String::new());
    let original = MeterData {
        session_uuid: "abc".to_string(),
        position: 1,
        category: "cat".to_string(),
        context,
        ..Default::default()
    };
    let text = serialize(&original);
    assert!(text.contains("missing:<null>"));
    let parsed = parse(&text).expect("round-trip");
    assert_eq!(parsed.context.get("missing"), Some(&String::new()));
}

#[test]
fn quoted_values_preserve_escaped_quotes() {
    let original = MeterData {
        session_uuid: "abc".to_string(),
        position: 1,
        category: "cat".to_string(),
        description: Some(r#"has "quotes" inside"#.to_string()),
        ..Default::default()
    };
    let text = serialize(&original);
    let parsed = parse(&text).expect("round-trip");
    assert_eq!(parsed.description.as_deref(), Some(r#"has "quotes" inside"#));
}

#[test]
fn context_key_order_is_preserved() {
    let text = serialize(&sample());
    let parsed = parse(&text).expect("round-trip");
    let keys: Vec<_> = parsed.context.keys().cloned().collect();
    assert_eq!(keys, vec!["userId".to_string(), "region".to_string()]);
}
