use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, error, info};
use wbtags_core::{error::HostError, host::SettingsHost};

use crate::{debounce::Debouncer, error::HostIoError};

/// Settings object backed by a JSON file.
///
/// The whole file is read into memory when opened. Namespace writes only touch
/// memory. The file is rewritten by [`FileSettingsHost::flush`] once a save has
/// been requested, either by an explicit flush or by the save debouncer.
/// Writes nobody asked to save (a freshly created namespace, say) stay in memory.
#[derive(Debug)]
pub struct FileSettingsHost {
    inner: Arc<SettingsFile>,
    debouncer: Option<Debouncer>,
}

#[derive(Debug)]
struct SettingsFile {
    path: PathBuf,
    settings: Mutex<Map<String, Value>>,
    save_pending: AtomicBool,
}

impl FileSettingsHost {
    /// Read `path` into memory. A missing file is an empty settings object.
    ///
    /// Without [`FileSettingsHost::with_debounce`] save requests are only
    /// remembered and [`FileSettingsHost::flush`] must be called explicitly.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, HostIoError> {
        let path = path.into();
        let settings = read_settings(&path)?;
        debug!(path = %path.display(), namespaces = settings.len(), "settings loaded");

        Ok(Self {
            inner: Arc::new(SettingsFile {
                path,
                settings: Mutex::new(settings),
                save_pending: AtomicBool::new(false),
            }),
            debouncer: None,
        })
    }

    /// Flush automatically once save requests have been quiet for `delay`.
    ///
    /// Must be called within a tokio runtime.
    pub fn with_debounce(mut self, delay: Duration) -> Result<Self, HostIoError> {
        let file = Arc::clone(&self.inner);
        let debouncer = Debouncer::spawn(delay, move || {
            if let Err(e) = file.flush() {
                error!(path = %file.path.display(), error = %e, "debounced settings save failed");
            }
        })?;
        self.debouncer = Some(debouncer);
        Ok(self)
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// `true` when a save was requested and has not reached the disk yet.
    pub fn is_save_pending(&self) -> bool {
        self.inner.save_pending.load(Ordering::SeqCst)
    }

    /// Write the settings to disk now if a save was requested.
    pub fn flush(&self) -> Result<(), HostIoError> {
        self.inner.flush()
    }

    /// Stop the debouncer and write any requested save.
    pub async fn close(&self) -> Result<(), HostIoError> {
        if let Some(debouncer) = &self.debouncer {
            debouncer.shutdown().await;
        }
        self.inner.flush()
    }
}

impl SettingsFile {
    fn flush(&self) -> Result<(), HostIoError> {
        if !self.save_pending.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        let snapshot = match self.settings.lock() {
            Ok(settings) => Value::Object(settings.clone()),
            Err(_) => {
                self.save_pending.store(true, Ordering::SeqCst);
                return Err(HostIoError::Poisoned);
            }
        };

        if let Err(e) = write_atomically(&self.path, &snapshot) {
            self.save_pending.store(true, Ordering::SeqCst);
            return Err(e);
        }
        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

impl SettingsHost for FileSettingsHost {
    fn read_namespace(&self, namespace: &str) -> Result<Option<Map<String, Value>>, HostError> {
        let settings = self.inner.settings.lock().map_err(|_| HostIoError::Poisoned)?;
        match settings.get(namespace) {
            None => Ok(None),
            Some(Value::Object(obj)) => Ok(Some(obj.clone())),
            Some(other) => Err(HostError::Malformed(format!(
                "namespace {namespace} is not an object: {other}"
            ))),
        }
    }

    fn write_namespace(&self, namespace: &str, value: Map<String, Value>) -> Result<(), HostError> {
        let mut settings = self.inner.settings.lock().map_err(|_| HostIoError::Poisoned)?;
        settings.insert(namespace.to_string(), Value::Object(value));
        Ok(())
    }

    fn schedule_save(&self) -> Result<(), HostError> {
        self.inner.save_pending.store(true, Ordering::SeqCst);
        if let Some(debouncer) = &self.debouncer {
            debouncer.request();
        }
        Ok(())
    }
}

fn read_settings(path: &Path) -> Result<Map<String, Value>, HostIoError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
        Err(e) => return Err(e.into()),
    };
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str(&raw)? {
        Value::Object(obj) => Ok(obj),
        other => Err(HostIoError::Malformed(format!(
            "{}: top level must be an object, got {other}",
            path.display()
        ))),
    }
}

/// Write `value` next to `path` and rename it into place.
fn write_atomically(path: &Path, value: &Value) -> Result<(), HostIoError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, value)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| HostIoError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wbtags_core::store::TagStore;
    use wbtags_model::NAMESPACE;

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn missing_file_is_empty_settings() {
        let dir = tempfile::tempdir().unwrap();
        let host = FileSettingsHost::open(dir.path().join("settings.json")).unwrap();
        assert!(host.read_namespace(NAMESPACE).unwrap().is_none());
        assert!(!host.is_save_pending());
    }

    #[test]
    fn non_object_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(
            FileSettingsHost::open(&path),
            Err(HostIoError::Malformed(_))
        ));
    }

    #[test]
    fn flush_writes_only_after_a_save_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let host = FileSettingsHost::open(&path).unwrap();

        host.flush().unwrap();
        assert!(!path.exists());

        let mut ns = Map::new();
        ns.insert("tags".into(), json!({ "A": ["x"] }));
        host.write_namespace(NAMESPACE, ns).unwrap();
        assert!(!host.is_save_pending());
        host.flush().unwrap();
        assert!(!path.exists());

        host.schedule_save().unwrap();
        assert!(host.is_save_pending());
        host.flush().unwrap();
        assert!(!host.is_save_pending());
        assert_eq!(read_json(&path), json!({ NAMESPACE: { "tags": { "A": ["x"] } } }));
    }

    #[test]
    fn other_host_keys_survive_a_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"theme":"dark","other_ext":{"on":true}}"#).unwrap();

        let host = Arc::new(FileSettingsHost::open(&path).unwrap());
        let store = TagStore::new(host.clone());
        store.add_tag("A", "x");
        host.flush().unwrap();

        assert_eq!(
            read_json(&path),
            json!({
                "theme": "dark",
                "other_ext": { "on": true },
                NAMESPACE: { "tags": { "A": ["x"] } }
            })
        );
    }

    #[test]
    fn read_only_session_leaves_the_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let original = r#"{"theme":"dark"}"#;
        fs::write(&path, original).unwrap();

        let host = Arc::new(FileSettingsHost::open(&path).unwrap());
        let store = TagStore::new(host.clone()).open();
        assert!(store.all_tags().is_empty());
        assert!(host.read_namespace(NAMESPACE).unwrap().is_some());
        assert!(!host.is_save_pending());

        host.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn reopen_sees_flushed_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        {
            let host = Arc::new(FileSettingsHost::open(&path).unwrap());
            TagStore::new(host.clone()).set_tags("A", vec!["x".to_string(), "y".to_string()]);
            host.flush().unwrap();
        }

        let host = Arc::new(FileSettingsHost::open(&path).unwrap());
        assert_eq!(TagStore::new(host).get_tags("A"), vec!["x", "y"]);
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_save_reaches_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let host = Arc::new(
            FileSettingsHost::open(&path)
                .unwrap()
                .with_debounce(Duration::from_millis(100))
                .unwrap(),
        );
        let store = TagStore::new(host.clone());

        store.add_tag("A", "x");
        store.add_tag("A", "y");
        assert!(!path.exists());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(read_json(&path)[NAMESPACE]["tags"]["A"], json!(["x", "y"]));
        assert!(!host.is_save_pending());
        host.close().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn close_flushes_pending_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let host = Arc::new(
            FileSettingsHost::open(&path)
                .unwrap()
                .with_debounce(Duration::from_secs(60))
                .unwrap(),
        );

        TagStore::new(host.clone()).add_tag("A", "x");
        host.close().await.unwrap();

        assert_eq!(read_json(&path)[NAMESPACE]["tags"]["A"], json!(["x"]));
    }
}
