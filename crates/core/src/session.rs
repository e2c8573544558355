// SPDX-License-Identifier: MIT

//! Process-wide session identity and per-category monotonic positions.
//!
//! One [`Session`] is shared by every [`crate::meter::Meter`] in a process.
//! It hands out a short, stable `session_uuid` and allocates a strictly
//! increasing `position` per `category[/operation]` key.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

const BASE62_ALPHABET: [char; 62] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b',
    'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u',
    'v', 'w', 'x', 'y', 'z',
];

/// Process-wide identity and position allocator.
///
/// The counter map is a coarse-grained insertion lock guarding a per-key
/// [`AtomicU64`]: the lock is only taken the first time a given category
/// key is seen, after which allocation is a lock-free fetch-add.
pub struct Session {
    uuid: String,
    counters: Mutex<HashMap<String, Arc<AtomicU64>>>,
}

impl Session {
    /// Construct a session with an explicit uuid (for tests) of arbitrary
    /// content — production code should go through [`Session::process`].
    pub fn with_uuid(uuid: impl Into<String>) -> Self {
        Self { uuid: uuid.into(), counters: Mutex::new(HashMap::new()) }
    }

    /// Generate a new session with a random base-62 uuid of `len` characters.
    pub fn generate(len: usize) -> Self {
        Self::with_uuid(nanoid::nanoid!(len, &BASE62_ALPHABET))
    }

    /// The process-wide singleton, lazily created with the default uuid
    /// length (8 base-62 characters, matching `session.uuid_length`'s
    /// default in spec.md §6).
    pub fn process() -> &'static Session {
        static PROCESS: OnceLock<Session> = OnceLock::new();
        PROCESS.get_or_init(|| Session::generate(8))
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Allocate the next strictly-increasing position for `key`
    /// (`category` or `category/operation`). Positions start at 1.
    pub fn next_position(&self, key: &str) -> u64 {
        // Fast path: key already registered, no lock needed beyond the read.
        if let Some(counter) = self.counters.lock().get(key) {
            return counter.fetch_add(1, Ordering::SeqCst) + 1;
        }
        let mut counters = self.counters.lock();
        let counter = counters.entry(key.to_string()).or_insert_with(|| Arc::new(AtomicU64::new(0)));
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Build the full id string for a record: `"{category}#{position}"` or
/// `"{category}/{operation}#{position}"`.
pub fn full_id(category: &str, operation: Option<&str>, position: u64) -> String {
    match operation {
        Some(op) => format!("{category}/{op}#{position}"),
        None => format!("{category}#{position}"),
    }
}

/// Build the counter key for `next_position` from category/operation.
pub fn position_key(category: &str, operation: Option<&str>) -> String {
    match operation {
        Some(op) => format!("{category}/{op}"),
        None => category.to_string(),
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
