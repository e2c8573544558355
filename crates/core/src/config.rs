// SPDX-License-Identifier: MIT

//! Recognized configuration keys (spec.md §6).
//!
//! Configuration never fails loudly: parse errors are appended to an
//! inspectable list and the default value is substituted, matching
//! spec.md §7 "Configuration parse errors — recorded to an inspectable
//! list; defaults applied."

use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid duration for `{key}`: {value:?} (expected a number followed by ms|s|m|h)")]
    InvalidDuration { key: String, value: String },
    #[error("invalid boolean for `{key}`: {value:?}")]
    InvalidBool { key: String, value: String },
    #[error("invalid uuid length for `session.uuid_length`: {value:?}")]
    InvalidUuidLength { value: String },
}

/// Parsed, defaulted configuration plus the list of parse errors
/// encountered while loading it.
#[derive(Debug, Clone)]
pub struct Config {
    pub session_uuid_length: usize,
    pub meter_message_prefix: String,
    pub meter_message_suffix: String,
    pub meter_data_prefix: String,
    pub meter_data_suffix: String,
    pub progress_period: Duration,
    pub enable_data: bool,
    errors: Vec<ConfigError>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_uuid_length: 8,
            meter_message_prefix: String::new(),
            meter_message_suffix: String::new(),
            meter_data_prefix: String::new(),
            meter_data_suffix: String::new(),
            progress_period: Duration::from_secs(2),
            enable_data: true,
            errors: Vec::new(),
        }
    }
}

impl Config {
    /// Load from a flat string-keyed map (e.g. the caller's own properties
    /// source flattened to dotted keys). Unknown keys are ignored; invalid
    /// values fall back to the default and are recorded in `errors()`.
    pub fn from_map(raw: &BTreeMap<String, String>) -> Self {
        let mut config = Config::default();

        if let Some(v) = raw.get("session.uuid_length") {
            match v.parse::<usize>() {
                Ok(n) if n > 0 => config.session_uuid_length = n,
                _ => config.errors.push(ConfigError::InvalidUuidLength { value: v.clone() }),
            }
        }
        if let Some(v) = raw.get("meter.message.prefix") {
            config.meter_message_prefix = v.clone();
        }
        if let Some(v) = raw.get("meter.message.suffix") {
            config.meter_message_suffix = v.clone();
        }
        if let Some(v) = raw.get("meter.data.prefix") {
            config.meter_data_prefix = v.clone();
        }
        if let Some(v) = raw.get("meter.data.suffix") {
            config.meter_data_suffix = v.clone();
        }
        if let Some(v) = raw.get("meter.progress.period") {
            match parse_duration(v) {
                Ok(d) => config.progress_period = d,
                Err(_) => config
                    .errors
                    .push(ConfigError::InvalidDuration { key: "meter.progress.period".to_string(), value: v.clone() }),
            }
        }
        if let Some(v) = raw.get("meter.enable_data") {
            match v.as_str() {
                "true" => config.enable_data = true,
                "false" => config.enable_data = false,
                _ => config
                    .errors
                    .push(ConfigError::InvalidBool { key: "meter.enable_data".to_string(), value: v.clone() }),
            }
        }

        config
    }

    /// Errors recorded while loading; empty if every recognized key parsed.
    pub fn errors(&self) -> &[ConfigError] {
        &self.errors
    }

    /// Load from a TOML document, the natural on-disk shape for the dotted
    /// keys spec.md §6 documents (`[session]` / `uuid_length`,
    /// `[meter.message]` / `prefix`, ...). Malformed TOML yields an
    /// all-defaults `Config` — structural parse failures aren't per-key, so
    /// there's nothing to record in `errors()` beyond "nothing was read".
    pub fn from_toml(raw: &str) -> Config {
        match raw.parse::<toml::Value>() {
            Ok(value) => {
                let mut flat = BTreeMap::new();
                flatten_toml(&value, String::new(), &mut flat);
                Config::from_map(&flat)
            }
            Err(_) => Config::default(),
        }
    }
}

fn flatten_toml(value: &toml::Value, prefix: String, out: &mut BTreeMap<String, String>) {
    match value {
        toml::Value::Table(table) => {
            for (key, nested) in table {
                let full_key = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
                flatten_toml(nested, full_key, out);
            }
        }
        toml::Value::String(s) => {
            out.insert(prefix, s.clone());
        }
        toml::Value::Integer(n) => {
            out.insert(prefix, n.to_string());
        }
        toml::Value::Boolean(b) => {
            out.insert(prefix, b.to_string());
        }
        _ => {}
    }
}

/// Parse a duration with a unit suffix: `ms|s|m|h`. Grounded on the
/// `{ms,s,m,h}` suffix vocabulary spec.md §6 documents for
/// `meter.progress.period`.
fn parse_duration(raw: &str) -> Result<Duration, ()> {
    let raw = raw.trim();
    let (number, unit) = if let Some(n) = raw.strip_suffix("ms") {
        (n, "ms")
    } else if let Some(n) = raw.strip_suffix('s') {
        (n, "s")
    } else if let Some(n) = raw.strip_suffix('m') {
        (n, "m")
    } else if let Some(n) = raw.strip_suffix('h') {
        (n, "h")
    } else {
        return Err(());
    };
    let value: u64 = number.trim().parse().map_err(|_| ())?;
    Ok(match unit {
        "ms" => Duration::from_millis(value),
        "s" => Duration::from_secs(value),
        "m" => Duration::from_secs(value * 60),
        "h" => Duration::from_secs(value * 3600),
        _ => unreachable!("unit is one of the four matched suffixes"),
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
