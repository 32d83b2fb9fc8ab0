//! Persisted key-value storage.
//!
//! The calculator treats its host storage as a flat string-to-string map,
//! the shape a browser's local storage would provide. [`MemoryStore`] backs
//! logged-out sessions and tests; [`JsonFileStore`] persists the map as a
//! single JSON object in the platform config directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;

/// Well-known storage keys.
pub mod keys {
    /// Registered user record, JSON-encoded.
    pub const USER: &str = "user";
    /// Login-session marker.
    pub const TOKEN: &str = "token";
    /// Calculation history, a JSON array of `{calc, result}` pairs.
    pub const HISTORY: &str = "history";
}

/// Abstract string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Look up a value, `None` if absent.
    fn get(&self, key: &str) -> Option<String>;
    /// Insert or replace a value.
    fn set(&self, key: &str, value: &str);
    /// Delete a value, a no-op if absent.
    fn remove(&self, key: &str);
}

/// Errors opening or writing the file-backed store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// In-memory store. Contents are discarded when dropped.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut data) = self.data.lock() {
            data.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut data) = self.data.lock() {
            data.remove(key);
        }
    }
}

/// File-backed store, written through on every mutation.
pub struct JsonFileStore {
    path: PathBuf,
    data: Mutex<BTreeMap<String, String>>,
}

/// Returns the default store location, e.g. `~/.config/romancalc/store.json`.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("romancalc/store.json"))
}

impl JsonFileStore {
    /// Open a store at `path`, creating parent directories as needed.
    ///
    /// A missing file yields an empty store; an unreadable or corrupt file is
    /// treated the same way rather than failing the session.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "corrupt store file, starting empty");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, data: &BTreeMap<String, String>) {
        let json = match serde_json::to_string_pretty(data) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize store");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            warn!(path = %self.path.display(), error = %e, "failed to write store");
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut data) = self.data.lock() {
            data.insert(key.to_string(), value.to_string());
            self.flush(&data);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut data) = self.data.lock() {
            data.remove(key);
            self.flush(&data);
        }
    }
}
