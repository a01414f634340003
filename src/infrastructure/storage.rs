use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::error::{AppError, Result};

/// Storage keys, kept byte-identical to the browser localStorage contract the
/// dashboard always used.
pub mod keys {
    pub const PERSIST_FILTERS: &str = "persistFilters";
    pub const DASHBOARD_FILTERS: &str = "dashboardFilters";
    pub const THEME: &str = "theme";
    pub const COLOR_SCHEME: &str = "colorScheme";
    pub const CUSTOM_COLOR: &str = "customColor";
}

/// Durable key/value store for user preferences: one JSON object persisted to
/// a single file under the data directory, rewritten on every change.
pub struct PreferenceStore {
    path: PathBuf,
    values: Mutex<HashMap<String, Value>>,
}

impl PreferenceStore {
    pub fn open(data_dir: &Path) -> Result<Self> {
        ensure_dir(data_dir)?;
        let path = data_dir.join("preferences.json");

        let values = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Unreadable preference file, starting fresh");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Read and decode a stored value. A missing key and an undecodable value
    /// both come back as `None`; stale garbage must never block startup.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let values = self.values.lock().unwrap();
        let value = values.get(key)?.clone();
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!(key, error = %err, "Ignoring undecodable preference value");
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_value(value)
            .map_err(|e| AppError::StorageError(format!("Failed to encode {}: {}", key, e)))?;

        let mut values = self.values.lock().unwrap();
        values.insert(key.to_string(), encoded);
        self.flush(&values)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap();
        if values.remove(key).is_none() {
            return Ok(());
        }
        self.flush(&values)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.lock().unwrap().contains_key(key)
    }

    fn flush(&self, values: &HashMap<String, Value>) -> Result<()> {
        let raw = serde_json::to_string_pretty(values)
            .map_err(|e| AppError::StorageError(format!("Failed to encode preferences: {}", e)))?;
        fs::write(&self.path, raw)
            .map_err(|e| AppError::StorageError(format!("Failed to write preferences: {}", e)))
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
