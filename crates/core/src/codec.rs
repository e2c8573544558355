// SPDX-License-Identifier: MIT

//! The flat, order-stable textual record format (spec.md §6).
//!
//! `serialize` always emits keys in the documented order, omitting any key
//! whose value is default (`0`, `None`, empty). `parse` is tolerant of
//! extra whitespace and unknown keys, and rejects a record missing
//! `sessionUuid` or `position`.

use crate::data::MeterData;
use indexmap::IndexMap;
use once_cell_regex::{ident_re, number_re, quoted_string_re};
use thiserror::Error;

/// The documented, round-trip-stable key order.
const KEY_ORDER: &[&str] = &[
    "sessionUuid",
    "position",
    "category",
    "operation",
    "parent",
    "description",
    "createTime",
    "startTime",
    "stopTime",
    "timeLimit",
    "currentIteration",
    "expectedIterations",
    "okPath",
    "rejectPath",
    "failPath",
    "failMessage",
    "context",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("record is missing required key `sessionUuid`")]
    MissingSessionUuid,
    #[error("record is missing required key `position`")]
    MissingPosition,
    #[error("malformed record: expected `{{` ... `}}`, got {0:?}")]
    NotAnObject(String),
    #[error("malformed key/value pair: {0:?}")]
    MalformedPair(String),
    #[error("malformed numeric value for key `{key}`: {value:?}")]
    MalformedNumber { key: String, value: String },
}

/// Quote a string value. Value positions are always rendered as quoted
/// strings (escaping `\` and `"`); bareness only applies to context keys.
fn quote_value(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn unquote_value(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '"' || next == '\\' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// A bare identifier-looking key is left unquoted; anything else (spaces,
/// separators, quotes, non-ASCII) is quoted.
fn render_key(key: &str) -> String {
    if ident_re().is_match(key) {
        key.to_string()
    } else {
        quote_value(key)
    }
}

pub(crate) fn render_context(context: &IndexMap<String, String>) -> String {
    let mut parts = Vec::with_capacity(context.len());
    for (k, v) in context {
        let rendered_v = if v.is_empty() { "<null>".to_string() } else { quote_value(v) };
        parts.push(format!("{}:{}", render_key(k), rendered_v));
    }
    format!("{{{}}}", parts.join(","))
}

/// Serialize one `MeterData` to the flat textual format. Default-valued
/// fields are omitted entirely.
pub fn serialize(data: &MeterData) -> String {
    let mut parts = Vec::with_capacity(KEY_ORDER.len());
    parts.push(format!("sessionUuid:{}", quote_value(&data.session_uuid)));
    parts.push(format!("position:{}", data.position));
    parts.push(format!("category:{}", quote_value(&data.category)));
    if let Some(op) = &data.operation {
        parts.push(format!("operation:{}", quote_value(op)));
    }
    if let Some(parent) = &data.parent {
        parts.push(format!("parent:{}", quote_value(parent)));
    }
    if let Some(description) = &data.description {
        parts.push(format!("description:{}", quote_value(description)));
    }
    if data.create_time != 0 {
        parts.push(format!("createTime:{}", data.create_time));
    }
    if data.start_time != 0 {
        parts.push(format!("startTime:{}", data.start_time));
    }
    if data.stop_time != 0 {
        parts.push(format!("stopTime:{}", data.stop_time));
    }
    if data.time_limit_ms != 0 {
        parts.push(format!("timeLimit:{}", data.time_limit_ms));
    }
    if data.current_iteration != 0 {
        parts.push(format!("currentIteration:{}", data.current_iteration));
    }
    if data.expected_iterations != 0 {
        parts.push(format!("expectedIterations:{}", data.expected_iterations));
    }
    if let Some(ok_path) = &data.ok_path {
        parts.push(format!("okPath:{}", quote_value(ok_path)));
    }
    if let Some(reject_path) = &data.reject_path {
        parts.push(format!("rejectPath:{}", quote_value(reject_path)));
    }
    if let Some(fail_path) = &data.fail_path {
        parts.push(format!("failPath:{}", quote_value(fail_path)));
    }
    if let Some(fail_message) = &data.fail_message {
        parts.push(format!("failMessage:{}", quote_value(fail_message)));
    }
    if !data.context.is_empty() {
        parts.push(format!("context:{}", render_context(&data.context)));
    }
    format!("{{{}}}", parts.join(","))
}

/// Split `s` on top-level occurrences of `delim`, ignoring delimiters inside
/// quoted strings or nested `{...}` blocks.
fn split_top_level(s: &str, delim: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut current = String::new();
    for c in s.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => {
                current.push(c);
                escaped = true;
            }
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            '{' if !in_quotes => {
                depth += 1;
                current.push(c);
            }
            '}' if !in_quotes => {
                depth -= 1;
                current.push(c);
            }
            c if c == delim && !in_quotes && depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current);
    }
    parts
}

fn strip_braces(s: &str) -> Result<&str, CodecError> {
    let trimmed = s.trim();
    trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| CodecError::NotAnObject(trimmed.to_string()))
}

fn parse_context(value: &str) -> Result<IndexMap<String, String>, CodecError> {
    let inner = strip_braces(value)?;
    let mut map = IndexMap::new();
    for pair in split_top_level(inner, ',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let (key_raw, value_raw) =
            pair.split_once(':').ok_or_else(|| CodecError::MalformedPair(pair.to_string()))?;
        let key = unquote_key(key_raw.trim());
        let value_raw = value_raw.trim();
        let value = if value_raw == "<null>" {
            String::new()
        } else if quoted_string_re().is_match(value_raw) {
            unquote_value(&value_raw[1..value_raw.len() - 1])
        } else {
            value_raw.to_string()
        };
        map.insert(key, value);
    }
    Ok(map)
}

fn unquote_key(key: &str) -> String {
    if key.len() >= 2 && key.starts_with('"') && key.ends_with('"') {
        unquote_value(&key[1..key.len() - 1])
    } else {
        key.to_string()
    }
}

/// Parse one flat textual record. Tolerant of extra whitespace and unknown
/// keys; rejects a record missing `sessionUuid` or `position`.
pub fn parse(text: &str) -> Result<MeterData, CodecError> {
    let inner = strip_braces(text)?;
    let mut data = MeterData::default();
    let mut seen_session_uuid = false;
    let mut seen_position = false;

    for pair in split_top_level(inner, ',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let (key, value) =
            pair.split_once(':').ok_or_else(|| CodecError::MalformedPair(pair.to_string()))?;
        let key = key.trim();
        let value = value.trim();

        let as_string = |v: &str| -> String {
            if quoted_string_re().is_match(v) {
                unquote_value(&v[1..v.len() - 1])
            } else {
                v.to_string()
            }
        };
        let as_u64 = |v: &str| -> Result<u64, CodecError> {
            if !number_re().is_match(v) {
                return Err(CodecError::MalformedNumber { key: key.to_string(), value: v.to_string() });
            }
            v.parse::<u64>().map_err(|_| CodecError::MalformedNumber {
                key: key.to_string(),
                value: v.to_string(),
            })
        };

        match key {
            "sessionUuid" => {
                data.session_uuid = as_string(value);
                seen_session_uuid = true;
            }
            "position" => {
                data.position = as_u64(value)?;
                seen_position = true;
            }
            "category" => data.category = as_string(value),
            "operation" => data.operation = Some(as_string(value)),
            "parent" => data.parent = Some(as_string(value)),
            "description" => data.description = Some(as_string(value)),
            "createTime" => data.create_time = as_u64(value)?,
            "startTime" => data.start_time = as_u64(value)?,
            "stopTime" => data.stop_time = as_u64(value)?,
            "timeLimit" => data.time_limit_ms = as_u64(value)?,
            "currentIteration" => data.current_iteration = as_u64(value)?,
            "expectedIterations" => data.expected_iterations = as_u64(value)?,
            "okPath" => data.ok_path = Some(as_string(value)),
            "rejectPath" => data.reject_path = Some(as_string(value)),
            "failPath" => data.fail_path = Some(as_string(value)),
            "failMessage" => data.fail_message = Some(as_string(value)),
            "context" => data.context = parse_context(value)?,
            _ => { /* unknown keys are ignored, per spec.md §6 */ }
        }
    }

    if !seen_session_uuid {
        return Err(CodecError::MissingSessionUuid);
    }
    if !seen_position {
        return Err(CodecError::MissingPosition);
    }
    Ok(data)
}

/// Lazily-compiled regexes shared by the parser, kept in one place so the
/// "regex-based" requirement in spec.md §6 is satisfied by construction
/// rather than ad hoc string scanning.
mod once_cell_regex {
    use regex::Regex;
    use std::sync::LazyLock;

    // Allow expect here as each pattern is compile-time verified to be valid.
    #[allow(clippy::expect_used)]
    static IDENT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("constant regex pattern is valid"));

    #[allow(clippy::expect_used)]
    static NUMBER_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("constant regex pattern is valid"));

    #[allow(clippy::expect_used)]
    static QUOTED_STRING_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"^"(?:[^"\\]|\\.)*"$"#).expect("constant regex pattern is valid")
    });

    pub fn ident_re() -> &'static Regex {
        &IDENT_RE
    }

    pub fn number_re() -> &'static Regex {
        &NUMBER_RE
    }

    pub fn quoted_string_re() -> &'static Regex {
        &QUOTED_STRING_RE
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
