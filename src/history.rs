//! Calculation history.
//!
//! Completed calculations are appended to an ordered log capped at
//! [`HISTORY_CAP`] entries; when the cap is exceeded the oldest entry is
//! evicted. The log is only persisted while a login marker is present in the
//! store; logged-out sessions keep history in memory and lose it on exit.

use crate::storage::{KeyValueStore, keys};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Maximum number of stored history entries.
pub const HISTORY_CAP: usize = 16;

/// One completed calculation.
///
/// The wire names (`calc`/`result`) match the persisted JSON format.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// Human-readable operand/operator chain, e.g. `"I + II"`.
    #[serde(rename = "calc")]
    pub expression: String,
    /// Numeral-rendered final value, e.g. `"III"`.
    pub result: String,
}

impl HistoryEntry {
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
        }
    }
}

/// Ordered log of completed calculations, newest last.
#[derive(Debug, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load persisted history. Returns an empty log when logged out, when
    /// nothing is stored, or when the stored value does not parse.
    pub fn load_from(store: &dyn KeyValueStore) -> Self {
        if store.get(keys::TOKEN).is_none() {
            return Self::new();
        }
        let entries = store
            .get(keys::HISTORY)
            .and_then(|json| serde_json::from_str::<Vec<HistoryEntry>>(&json).ok())
            .unwrap_or_default();
        Self {
            entries: entries.into_iter().take(HISTORY_CAP).collect(),
        }
    }

    /// Append an entry, evicting the oldest once the cap is exceeded.
    pub fn commit(&mut self, entry: HistoryEntry) {
        debug!(expression = %entry.expression, result = %entry.result, "committing calculation");
        self.entries.push_back(entry);
        while self.entries.len() > HISTORY_CAP {
            if let Some(evicted) = self.entries.pop_front() {
                debug!(expression = %evicted.expression, "evicting oldest history entry");
            }
        }
    }

    /// Persist the log, but only while logged in.
    pub fn save_to(&self, store: &dyn KeyValueStore) {
        if store.get(keys::TOKEN).is_none() {
            return;
        }
        if let Ok(json) = serde_json::to_string(&Vec::from_iter(self.entries.iter().cloned())) {
            store.set(keys::HISTORY, &json);
        }
    }

    /// Drop all entries and any persisted copy.
    pub fn clear(&mut self, store: &dyn KeyValueStore) {
        self.entries.clear();
        store.remove(keys::HISTORY);
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
