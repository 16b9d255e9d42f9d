use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tracing::trace;
use wbtags_core::{error::HostError, host::LegacyStore};

use crate::error::HostIoError;

/// Flat key-value store kept as a single JSON object file.
///
/// The file is read on every lookup and never written. String values are
/// returned as they are; any other JSON value is returned in its encoded form.
#[derive(Debug, Clone)]
pub struct FileLegacyStore {
    path: PathBuf,
}

impl FileLegacyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lookup(&self, key: &str) -> Result<Option<String>, HostIoError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut items = match serde_json::from_str::<Value>(&raw)? {
            Value::Object(items) => items,
            other => {
                return Err(HostIoError::Malformed(format!(
                    "{}: legacy store must be an object, got {other}",
                    self.path.display()
                )));
            }
        };

        Ok(match items.remove(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        })
    }
}

impl LegacyStore for FileLegacyStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, HostError> {
        let item = self.lookup(key)?;
        trace!(key, found = item.is_some(), "legacy lookup");
        Ok(item)
    }
}
