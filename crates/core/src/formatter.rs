// SPDX-License-Identifier: MIT

//! The human-readable one-line renderer (spec.md §4.6 "Formatting").
//!
//! Produces the message-channel text for a lifecycle event: full id,
//! optional description, elapsed time, iteration progress, throughput, and
//! the context delta. Separate unit helpers ([`format_duration_nanos`],
//! [`format_count`], [`format_bytes`]) are exposed because callers
//! embedding Meter output in their own messages need the same adaptive
//! units (SPEC_FULL.md Supplemented Feature #3).

use crate::data::MeterData;
use crate::marker::Marker;

/// Render nanoseconds with adaptive unit selection: `ns` below 1000ns,
/// `us` below 1000us, `ms` below 1000ms, `s` below 60s, `m` below 60m,
/// `h` beyond.
pub fn format_duration_nanos(nanos: u64) -> String {
    const US: u64 = 1_000;
    const MS: u64 = 1_000_000;
    const S: u64 = 1_000_000_000;
    const M: u64 = 60 * S;
    const H: u64 = 60 * M;

    if nanos < US {
        format!("{nanos}ns")
    } else if nanos < MS {
        format!("{:.2}us", nanos as f64 / US as f64)
    } else if nanos < S {
        format!("{:.2}ms", nanos as f64 / MS as f64)
    } else if nanos < M {
        format!("{:.2}s", nanos as f64 / S as f64)
    } else if nanos < H {
        format!("{:.2}m", nanos as f64 / M as f64)
    } else {
        format!("{:.2}h", nanos as f64 / H as f64)
    }
}

/// Render a count with `k`/`M` suffixes past 1000/1_000_000.
pub fn format_count(n: u64) -> String {
    if n < 1_000 {
        n.to_string()
    } else if n < 1_000_000 {
        format!("{:.1}k", n as f64 / 1_000.0)
    } else {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    }
}

/// Render a byte count with 1024-based `B`/`kB`/`MB`/`GB` units.
pub fn format_bytes(n: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let n = n as f64;
    if n < KB {
        format!("{}B", n as u64)
    } else if n < MB {
        format!("{:.2}kB", n / KB)
    } else if n < GB {
        format!("{:.2}MB", n / MB)
    } else {
        format!("{:.2}GB", n / GB)
    }
}

/// Render the human-readable message for one lifecycle event. `now` supplies
/// the clock reading for in-progress events (START/PROGRESS) where
/// `stop_time` is still `0`; terminal events ignore it since execution time
/// is already pinned to `stop_time`.
pub fn format_message(data: &MeterData, marker: Marker, now: u64) -> String {
    let mut out = data.full_id();

    if let Some(description) = &data.description {
        out.push_str(" - ");
        out.push_str(description);
    }

    if data.start_time != 0 {
        out.push_str(" [");
        out.push_str(&format_duration_nanos(data.execution_time_nanos(now)));
        if data.current_iteration > 0 || data.expected_iterations > 0 {
            out.push(' ');
            out.push_str(&format_count(data.current_iteration));
            if data.expected_iterations > 0 {
                out.push('/');
                out.push_str(&format_count(data.expected_iterations));
            }
        }
        let throughput = data.iterations_per_second(now);
        if throughput > 0.0 {
            out.push_str(&format!(" {throughput:.1}/s"));
        }
        out.push(']');
    }

    match marker {
        Marker::MsgOk | Marker::MsgSlowOk => {
            out.push_str(&format!(" ok={}", data.ok_path.as_deref().unwrap_or("-")));
        }
        Marker::MsgReject => {
            out.push_str(&format!(" reject={}", data.reject_path.as_deref().unwrap_or("-")));
        }
        Marker::MsgFail => {
            out.push_str(&format!(" fail={}", data.fail_path.as_deref().unwrap_or("-")));
            if let Some(message) = &data.fail_message {
                out.push_str(": ");
                out.push_str(message);
            }
        }
        _ => {}
    }

    if !data.context.is_empty() {
        out.push_str(" context=");
        out.push_str(&crate::codec::render_context(&data.context));
    }

    out
}

#[cfg(test)]
#[path = "formatter_tests.rs"]
mod tests;
