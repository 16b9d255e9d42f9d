use std::{
    fs,
    path::{Path, PathBuf},
};

use wbtags_core::{error::HostError, host::RecordSource};

/// Record names taken from the `*.json` files of a directory.
///
/// The name of a record is its file stem. Names are returned sorted.
#[derive(Debug, Clone)]
pub struct DirRecordSource {
    dir: PathBuf,
}

impl DirRecordSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RecordSource for DirRecordSource {
    fn record_names(&self) -> Result<Vec<String>, HostError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            HostError::Unavailable(format!("{}: {e}", self.dir.display()))
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
