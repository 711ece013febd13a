//! Logger configuration
//!
//! The configuration surface is a handful of toggles plus the capacity bounds.
//! Values live in a host-provided [`SettingsStore`] keyed by plugin identity.

mod settings;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::ConfigError;

pub use settings::{JsonFileSettings, MemorySettings, SettingsStore};

/// Identity under which settings are stored
pub const PLUGIN_NAME: &str = "MessageLogger";

/// Default capacity of each retention log
pub const DEFAULT_MAX_LOG_SIZE: usize = 1000;

/// Default capacity of the snapshot cache
pub const DEFAULT_MAX_CACHE_SIZE: usize = 10_000;

/// Runtime configuration of the logger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfig {
    pub log_deleted: bool,
    pub log_edited: bool,
    pub log_bulk_deleted: bool,
    pub show_notifications: bool,
    /// Capacity of each of the three logs
    pub max_log_size: usize,
    /// Capacity of the snapshot cache
    pub max_cache_size: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_deleted: true,
            log_edited: true,
            log_bulk_deleted: true,
            show_notifications: true,
            max_log_size: DEFAULT_MAX_LOG_SIZE,
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
        }
    }
}

impl LoggerConfig {
    /// Setting keys, as stored in the settings store
    pub const KEYS: [&'static str; 6] = [
        "logDeleted",
        "logEdited",
        "logBulkDeleted",
        "showNotifications",
        "maxLogSize",
        "maxCacheSize",
    ];

    /// Reject zero capacities
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_log_size == 0 {
            return Err(ConfigError::ZeroCapacity {
                field: "maxLogSize",
            });
        }
        if self.max_cache_size == 0 {
            return Err(ConfigError::ZeroCapacity {
                field: "maxCacheSize",
            });
        }
        Ok(())
    }

    /// Set one value by its settings key
    pub fn apply_setting(&mut self, key: &str, value: &Value) -> Result<(), ConfigError> {
        match key {
            "logDeleted" => self.log_deleted = expect_bool(key, value)?,
            "logEdited" => self.log_edited = expect_bool(key, value)?,
            "logBulkDeleted" => self.log_bulk_deleted = expect_bool(key, value)?,
            "showNotifications" => self.show_notifications = expect_bool(key, value)?,
            "maxLogSize" => {
                self.max_log_size = expect_capacity(key, "maxLogSize", value)?;
            }
            "maxCacheSize" => {
                self.max_cache_size = expect_capacity(key, "maxCacheSize", value)?;
            }
            other => return Err(ConfigError::UnknownSetting(other.to_string())),
        }
        Ok(())
    }

    /// Copy of this config with every key of `overrides` applied
    pub fn with_overrides(&self, overrides: &serde_json::Map<String, Value>) -> Result<Self, ConfigError> {
        let mut config = self.clone();
        for (key, value) in overrides {
            config.apply_setting(key, value)?;
        }
        Ok(config)
    }

    /// Current value of a settings key
    pub fn setting(&self, key: &str) -> Option<Value> {
        let value = match key {
            "logDeleted" => Value::from(self.log_deleted),
            "logEdited" => Value::from(self.log_edited),
            "logBulkDeleted" => Value::from(self.log_bulk_deleted),
            "showNotifications" => Value::from(self.show_notifications),
            "maxLogSize" => Value::from(self.max_log_size),
            "maxCacheSize" => Value::from(self.max_cache_size),
            _ => return None,
        };
        Some(value)
    }

    /// Read every key from the store, keeping defaults for missing or invalid values
    pub fn load(store: &dyn SettingsStore) -> Self {
        let mut config = Self::default();
        for key in Self::KEYS {
            if let Some(value) = store.get(PLUGIN_NAME, key) {
                if let Err(e) = config.apply_setting(key, &value) {
                    warn!(key, error = %e, "Ignoring stored setting");
                }
            }
        }
        config
    }

    /// Write every key to the store in one batch
    pub fn save(&self, store: &dyn SettingsStore) -> Result<(), crate::error::SettingsError> {
        let values: serde_json::Map<String, Value> = Self::KEYS
            .iter()
            .filter_map(|key| Some((key.to_string(), self.setting(key)?)))
            .collect();
        store.set_many(PLUGIN_NAME, values)
    }
}

fn expect_bool(key: &str, value: &Value) -> Result<bool, ConfigError> {
    value.as_bool().ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        expected: "a boolean",
    })
}

fn expect_capacity(key: &str, field: &'static str, value: &Value) -> Result<usize, ConfigError> {
    let size = value.as_u64().ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        expected: "a non-negative integer",
    })?;
    if size == 0 {
        return Err(ConfigError::ZeroCapacity { field });
    }
    Ok(usize::try_from(size).unwrap_or(usize::MAX))
}
