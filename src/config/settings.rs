//! Settings persistence
//!
//! The host keeps plugin settings in a key-value store keyed by plugin
//! identity. [`MemorySettings`] is a process-local store; [`JsonFileSettings`]
//! persists the same shape to a JSON file:
//!
//! ```text
//! { "MessageLogger": { "logDeleted": true, "maxLogSize": 1000 } }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::SettingsError;
use crate::utils::atomic::atomic_write;

/// Key-value settings keyed by plugin identity
pub trait SettingsStore: Send + Sync {
    fn get(&self, plugin: &str, key: &str) -> Option<Value>;

    fn set(&self, plugin: &str, key: &str, value: Value) -> Result<(), SettingsError>;

    /// Store several keys at once; either all of them land or none do
    fn set_many(&self, plugin: &str, values: Map<String, Value>) -> Result<(), SettingsError>;
}

/// Settings held in memory only
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, plugin: &str, key: &str) -> Option<Value> {
        self.values.read().get(plugin)?.get(key).cloned()
    }

    fn set(&self, plugin: &str, key: &str, value: Value) -> Result<(), SettingsError> {
        self.values
            .write()
            .entry(plugin.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn set_many(&self, plugin: &str, values: Map<String, Value>) -> Result<(), SettingsError> {
        self.values
            .write()
            .entry(plugin.to_string())
            .or_default()
            .extend(values);
        Ok(())
    }
}

/// Settings persisted to a JSON file, rewritten atomically on every change
#[derive(Debug)]
pub struct JsonFileSettings {
    path: PathBuf,
    root: RwLock<Map<String, Value>>,
}

impl JsonFileSettings {
    /// Open the settings file, starting empty if it does not exist yet
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();
        let root = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str::<Value>(&content)? {
                    Value::Object(map) => map,
                    _ => return Err(SettingsError::NotAnObject),
                }
            }
        } else {
            Map::new()
        };

        debug!(path = %path.display(), plugins = root.len(), "Opened settings file");
        Ok(Self {
            path,
            root: RwLock::new(root),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, root: &Map<String, Value>) -> Result<(), SettingsError> {
        let content = serde_json::to_string_pretty(root)?;
        atomic_write(&self.path, &content)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileSettings {
    fn get(&self, plugin: &str, key: &str) -> Option<Value> {
        self.root.read().get(plugin)?.get(key).cloned()
    }

    fn set(&self, plugin: &str, key: &str, value: Value) -> Result<(), SettingsError> {
        let mut values = Map::new();
        values.insert(key.to_string(), value);
        self.set_many(plugin, values)
    }

    /// Memory only changes once the file has been written
    fn set_many(&self, plugin: &str, values: Map<String, Value>) -> Result<(), SettingsError> {
        let mut root = self.root.write();
        let mut next = root.clone();
        let section = next
            .entry(plugin.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !section.is_object() {
            *section = Value::Object(Map::new());
        }
        if let Value::Object(map) = section {
            map.extend(values);
        }

        self.persist(&next)?;
        *root = next;
        Ok(())
    }
}
