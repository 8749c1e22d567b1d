//! Settings store seam: an asynchronous, eventually-synced key-value map.
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ext_logging::ext_warn;
use serde_json::Value;

use crate::StoreError;

/// Key under which the highlighter's enabled flag is stored.
pub const ENABLED_KEY: &str = "highlighterEnabled";

#[async_trait(?Send)]
pub trait SettingsStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Reads a boolean flag. Values of another type count as unset.
pub async fn read_flag(store: &dyn SettingsStore, key: &str) -> Result<Option<bool>, StoreError> {
    match store.get(key).await? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(flag)),
        Some(other) => {
            ext_warn!("ignoring non-boolean value {other} stored under {key}");
            Ok(None)
        }
    }
}

pub async fn write_flag(store: &dyn SettingsStore, key: &str, flag: bool) -> Result<(), StoreError> {
    store.set(key, Value::Bool(flag)).await
}

/// In-process store. Clones share the same map, the way every context of
/// one extension install sees the same synced storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    values: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: Value) -> Self {
        let store = Self::new();
        store.insert(key, value);
        store
    }

    pub fn insert(&self, key: &str, value: Value) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value);
        }
    }

    pub fn snapshot(&self, key: &str) -> Option<Value> {
        self.values.lock().ok()?.get(key).cloned()
    }
}

#[async_trait(?Send)]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self
            .values
            .lock()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self
            .values
            .lock()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}
