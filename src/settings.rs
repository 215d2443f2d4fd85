//! Persisted key/value settings.
//!
//! The storage mechanism is a boundary: the core consumes the
//! [`SettingsStore`] trait and ships two implementations — a JSON document
//! on disk with atomic replace, and an in-memory store for tests and
//! embedders that persist elsewhere.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;

use crate::constants::keys;
use crate::error::StoreError;

/// Key/value settings consumed and produced by the core.
///
/// Setters are full-replace and flush synchronously; failures surface as
/// [`StoreError`] and callers in the registry log and continue rather than
/// aborting the user's action.
pub trait SettingsStore: Send + Sync {
    /// Returns the list stored under `key`, or empty if absent.
    fn string_list(&self, key: &str) -> Vec<String>;

    /// Replaces the list stored under `key`.
    fn set_string_list(&self, key: &str, values: &[String]) -> Result<(), StoreError>;

    /// Returns the flag stored under `key`, or `false` if absent.
    fn bool_flag(&self, key: &str) -> bool;

    /// Replaces the flag stored under `key`.
    fn set_bool_flag(&self, key: &str, value: bool) -> Result<(), StoreError>;

    /// Returns the string stored under `key`, if any.
    fn string(&self, key: &str) -> Option<String>;

    /// Replaces the string stored under `key`, or removes it for `None`.
    fn set_string(&self, key: &str, value: Option<&str>) -> Result<(), StoreError>;
}

/// Convenience accessor for the panel's last selected collection. The core
/// never writes this key.
pub fn selected_collection(store: &dyn SettingsStore) -> Option<String> {
    store.string(keys::SELECTED_COLLECTION)
}

/// Settings persisted as a single JSON document.
///
/// The whole document is rewritten on every mutation via a temp file and
/// rename, so readers never observe a torn write and a crash mid-save
/// leaves the previous document intact.
pub struct JsonFileStore {
    path: PathBuf,
    doc: RwLock<BTreeMap<String, Value>>,
}

impl JsonFileStore {
    /// Opens (or initializes) the settings document at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let doc = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            doc: RwLock::new(doc),
        })
    }

    /// Opens the settings document at its default location under the user's
    /// data directory.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(default_data_dir().join("settings.json"))
    }

    fn save(&self, doc: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        atomic_write_json(&self.path, doc)
    }

    fn mutate(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, Value>),
    ) -> Result<(), StoreError> {
        let mut doc = self.doc.write().expect("settings lock poisoned");
        f(&mut doc);
        self.save(&doc)
    }
}

impl SettingsStore for JsonFileStore {
    fn string_list(&self, key: &str) -> Vec<String> {
        let doc = self.doc.read().expect("settings lock poisoned");
        match doc.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn set_string_list(&self, key: &str, values: &[String]) -> Result<(), StoreError> {
        let array = Value::Array(values.iter().map(|s| Value::String(s.clone())).collect());
        self.mutate(|doc| {
            doc.insert(key.to_owned(), array);
        })
    }

    fn bool_flag(&self, key: &str) -> bool {
        let doc = self.doc.read().expect("settings lock poisoned");
        doc.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    fn set_bool_flag(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.mutate(|doc| {
            doc.insert(key.to_owned(), Value::Bool(value));
        })
    }

    fn string(&self, key: &str) -> Option<String> {
        let doc = self.doc.read().expect("settings lock poisoned");
        doc.get(key).and_then(Value::as_str).map(str::to_owned)
    }

    fn set_string(&self, key: &str, value: Option<&str>) -> Result<(), StoreError> {
        self.mutate(|doc| match value {
            Some(v) => {
                doc.insert(key.to_owned(), Value::String(v.to_owned()));
            }
            None => {
                doc.remove(key);
            }
        })
    }
}

/// Non-persisted store for tests and embedders that manage persistence
/// themselves.
#[derive(Default)]
pub struct MemoryStore {
    doc: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn string_list(&self, key: &str) -> Vec<String> {
        let doc = self.doc.read().expect("settings lock poisoned");
        match doc.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn set_string_list(&self, key: &str, values: &[String]) -> Result<(), StoreError> {
        let array = Value::Array(values.iter().map(|s| Value::String(s.clone())).collect());
        self.doc
            .write()
            .expect("settings lock poisoned")
            .insert(key.to_owned(), array);
        Ok(())
    }

    fn bool_flag(&self, key: &str) -> bool {
        let doc = self.doc.read().expect("settings lock poisoned");
        doc.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    fn set_bool_flag(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.doc
            .write()
            .expect("settings lock poisoned")
            .insert(key.to_owned(), Value::Bool(value));
        Ok(())
    }

    fn string(&self, key: &str) -> Option<String> {
        let doc = self.doc.read().expect("settings lock poisoned");
        doc.get(key).and_then(Value::as_str).map(str::to_owned)
    }

    fn set_string(&self, key: &str, value: Option<&str>) -> Result<(), StoreError> {
        let mut doc = self.doc.write().expect("settings lock poisoned");
        match value {
            Some(v) => {
                doc.insert(key.to_owned(), Value::String(v.to_owned()));
            }
            None => {
                doc.remove(key);
            }
        }
        Ok(())
    }
}

/// Writes `value` as pretty JSON to `path` via a sibling temp file and
/// rename.
pub(crate) fn atomic_write_json<T: serde::Serialize>(
    path: &Path,
    value: &T,
) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Data directory for persisted state, derived from the platform's project
/// directories.
pub(crate) fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "fontswap", "fontswap")
        .map(|p| p.data_dir().to_path_buf())
        .unwrap_or_else(home_fallback)
}

/// Fallback if ProjectDirs fails (e.g., no HOME set).
/// This is a desktop utility that assumes a user session; failing fast in
/// headless scenarios is intentional.
fn home_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .map(|p| p.join(".local").join("share").join("fontswap"))
        .expect("HOME environment variable must be set for persisted settings")
}
