use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use serde_json::{Map, Value};

use crate::{error::HostError, host::LegacyStore, host::SettingsHost};

#[derive(Debug, Default)]
struct SettingsState {
    namespaces: Map<String, Value>,
    save_requests: usize,
    unavailable: bool,
}

/// In-process settings object.
///
/// Keeps namespaces in memory and counts save requests instead of writing anywhere.
/// Can be switched to an unavailable state to exercise degraded paths.
#[derive(Debug, Default)]
pub struct MemorySettings {
    state: Mutex<SettingsState>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with [`HostError::Unavailable`] while `true`.
    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.unavailable = unavailable;
        }
    }

    /// Number of [`SettingsHost::schedule_save`] calls received so far.
    pub fn save_requests(&self) -> usize {
        self.state.lock().map(|s| s.save_requests).unwrap_or(0)
    }

    /// Raw value stored under `namespace`, bypassing availability checks.
    pub fn raw(&self, namespace: &str) -> Option<Value> {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.namespaces.get(namespace).cloned())
    }

    /// Store an arbitrary value under `namespace`, bypassing availability checks.
    pub fn insert_raw(&self, namespace: &str, value: Value) {
        if let Ok(mut state) = self.state.lock() {
            state.namespaces.insert(namespace.to_string(), value);
        }
    }

    fn available(&self) -> Result<MutexGuard<'_, SettingsState>, HostError> {
        let state = self
            .state
            .lock()
            .map_err(|_| HostError::Unavailable("settings lock poisoned".into()))?;
        if state.unavailable {
            return Err(HostError::Unavailable("settings object is offline".into()));
        }
        Ok(state)
    }
}

impl SettingsHost for MemorySettings {
    fn read_namespace(&self, namespace: &str) -> Result<Option<Map<String, Value>>, HostError> {
        let state = self.available()?;
        match state.namespaces.get(namespace) {
            None => Ok(None),
            Some(Value::Object(obj)) => Ok(Some(obj.clone())),
            Some(other) => Err(HostError::Malformed(format!(
                "namespace {namespace} is not an object: {other}"
            ))),
        }
    }

    fn write_namespace(&self, namespace: &str, value: Map<String, Value>) -> Result<(), HostError> {
        let mut state = self.available()?;
        state
            .namespaces
            .insert(namespace.to_string(), Value::Object(value));
        Ok(())
    }

    fn schedule_save(&self) -> Result<(), HostError> {
        let mut state = self.available()?;
        state.save_requests += 1;
        Ok(())
    }
}

/// In-process flat string store standing in for the legacy location.
#[derive(Debug, Default)]
pub struct MemoryLegacy {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryLegacy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_item(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut items) = self.items.lock() {
            items.insert(key.into(), value.into());
        }
    }

    pub fn remove_item(&self, key: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.remove(key);
        }
    }
}

impl LegacyStore for MemoryLegacy {
    fn get_item(&self, key: &str) -> Result<Option<String>, HostError> {
        let items = self
            .items
            .lock()
            .map_err(|_| HostError::Unavailable("legacy lock poisoned".into()))?;
        Ok(items.get(key).cloned())
    }
}
