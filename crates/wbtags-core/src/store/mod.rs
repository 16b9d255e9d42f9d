//! Tag store: the single gateway for reading and mutating the tag mapping.
//!
//! Every read re-fetches the namespace from the host settings object; there is
//! no cache in between. Every mutation that changes the mapping writes the full
//! mapping back and asks the host to schedule a durable save.
//!
//! Failures never reach the caller. Reads fall back to an empty mapping, writes
//! are dropped, and both are logged.
mod init;
pub use init::InitOutcome;

use std::{fmt, sync::Arc};

use serde_json::{Map, Value};
use tracing::{debug, error, instrument, warn};
use wbtags_model::{NAMESPACE, TagList, TagMap, read_tags, unreadable_records, write_tags};

use crate::{
    error::StoreResult,
    host::{LegacyStore, SettingsHost},
    metrics::{MetricsHandle, SaveOutcome, noop_metrics},
};

/// Tag store bound to a host settings object.
#[derive(Clone)]
pub struct TagStore {
    settings: Arc<dyn SettingsHost>,
    legacy: Option<Arc<dyn LegacyStore>>,
    metrics: MetricsHandle,
    namespace: String,
}

impl TagStore {
    /// Create a store over `settings` using the default namespace and no legacy store.
    pub fn new(settings: Arc<dyn SettingsHost>) -> Self {
        Self {
            settings,
            legacy: None,
            metrics: noop_metrics(),
            namespace: NAMESPACE.to_string(),
        }
    }

    /// Attach the legacy store consulted when the namespace is created.
    pub fn with_legacy(mut self, legacy: Arc<dyn LegacyStore>) -> Self {
        self.legacy = Some(legacy);
        self
    }

    /// Replace the metrics backend.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Use a namespace other than [`NAMESPACE`].
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Initialize the namespace now instead of on first access.
    ///
    /// Builder-style counterpart of [`TagStore::initialize`]; a failure is logged
    /// and initialization is retried on the next access.
    pub fn open(self) -> Self {
        if let Err(e) = self.initialize() {
            warn!(namespace = %self.namespace, error = %e, "tag store initialization deferred");
        }
        self
    }

    /// Create the namespace (running the legacy migration) if it does not exist yet.
    pub fn initialize(&self) -> StoreResult<InitOutcome> {
        self.namespace_object().map(|(_, outcome)| outcome)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Current mapping. Empty on any failure.
    pub fn load(&self) -> TagMap {
        match self.try_load() {
            Ok(map) => map,
            Err(e) => {
                warn!(namespace = %self.namespace, error = %e, "tag load failed; using empty mapping");
                self.metrics.record_degraded_read();
                TagMap::new()
            }
        }
    }

    /// Persist `map` as the whole mapping. Failures are logged and dropped.
    pub fn save(&self, map: &TagMap) {
        match self.try_save(map) {
            Ok(()) => self.metrics.record_save(SaveOutcome::Saved),
            Err(e) => {
                error!(namespace = %self.namespace, error = %e, "tag save failed; change kept in memory only");
                self.metrics.record_save(SaveOutcome::Failed);
            }
        }
    }

    /// Tags of `record`, empty if it has none.
    pub fn get_tags(&self, record: &str) -> Vec<String> {
        self.load().tags_of(record).to_vec()
    }

    /// Replace the tag list of `record` as given (no dedup).
    #[instrument(level = "debug", skip(self, tags))]
    pub fn set_tags<T>(&self, record: &str, tags: T)
    where
        T: Into<TagList>,
    {
        let mut map = self.load();
        map.set(record, tags.into());
        self.commit("set", &map);
    }

    /// Append `tag` to `record` unless already present.
    ///
    /// Returns `true` if the mapping changed.
    #[instrument(level = "debug", skip(self))]
    pub fn add_tag(&self, record: &str, tag: &str) -> bool {
        self.mutate("add", |map| map.entry(record).insert(tag))
    }

    /// Remove every occurrence of `tag` from `record`.
    ///
    /// Returns `true` if the mapping changed.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_tag(&self, record: &str, tag: &str) -> bool {
        self.mutate("remove", |map| remove_from(map, record, tag))
    }

    /// Every distinct tag in use, sorted ascending.
    pub fn all_tags(&self) -> Vec<String> {
        self.load().distinct_tags()
    }

    /// Tags shared by all `records`.
    pub fn common_tags<S>(&self, records: &[S]) -> Vec<String>
    where
        S: AsRef<str>,
    {
        self.load().common_tags(records)
    }

    /// Add `tag` to each of `records` with a single save.
    ///
    /// Returns the number of records whose list changed.
    #[instrument(level = "debug", skip(self, records), fields(count = records.len()))]
    pub fn add_tag_to_many<S>(&self, records: &[S], tag: &str) -> usize
    where
        S: AsRef<str>,
    {
        self.mutate_many("bulk_add", |map| {
            records
                .iter()
                .filter(|r| map.entry(r.as_ref()).insert(tag))
                .count()
        })
    }

    /// Remove `tag` from each of `records` with a single save.
    ///
    /// Returns the number of records whose list changed.
    #[instrument(level = "debug", skip(self, records), fields(count = records.len()))]
    pub fn remove_tag_from_many<S>(&self, records: &[S], tag: &str) -> usize
    where
        S: AsRef<str>,
    {
        self.mutate_many("bulk_remove", |map| {
            records
                .iter()
                .filter(|r| remove_from(map, r.as_ref(), tag))
                .count()
        })
    }

    fn mutate<F>(&self, op: &'static str, f: F) -> bool
    where
        F: FnOnce(&mut TagMap) -> bool,
    {
        self.mutate_many(op, |map| usize::from(f(map))) > 0
    }

    fn mutate_many<F>(&self, op: &'static str, f: F) -> usize
    where
        F: FnOnce(&mut TagMap) -> usize,
    {
        let mut map = self.load();
        let changed = f(&mut map);
        if changed == 0 {
            debug!(op, "mapping unchanged; nothing to save");
            return 0;
        }
        self.commit(op, &map);
        changed
    }

    fn commit(&self, op: &'static str, map: &TagMap) {
        self.metrics.record_mutation(op);
        self.save(map);
    }

    fn try_load(&self) -> StoreResult<TagMap> {
        let (ns, _) = self.namespace_object()?;
        let unreadable = unreadable_records(&ns);
        if !unreadable.is_empty() {
            debug!(namespace = %self.namespace, records = ?unreadable, "skipping unreadable tag lists");
        }
        Ok(read_tags(&ns))
    }

    fn try_save(&self, map: &TagMap) -> StoreResult<()> {
        let (mut ns, _) = self.namespace_object()?;
        write_tags(&mut ns, map)?;
        self.settings.write_namespace(&self.namespace, ns)?;
        self.settings.schedule_save()?;
        Ok(())
    }

    fn namespace_object(&self) -> StoreResult<(Map<String, Value>, InitOutcome)> {
        init::ensure_namespace(
            self.settings.as_ref(),
            self.legacy.as_deref(),
            &self.namespace,
            self.metrics.as_ref(),
        )
    }
}

impl fmt::Debug for TagStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagStore")
            .field("namespace", &self.namespace)
            .field("legacy", &self.legacy.is_some())
            .field("metrics", &"<handle>")
            .finish()
    }
}

/// Remove `tag` from `record` without creating an entry for an unknown record.
fn remove_from(map: &mut TagMap, record: &str, tag: &str) -> bool {
    if !map.get(record).is_some_and(|list| list.contains(tag)) {
        return false;
    }
    map.entry(record).remove(tag)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use serde_json::json;
    use wbtags_model::LEGACY_TAGS_KEY;

    use super::*;
    use crate::{
        host::{MemoryLegacy, MemorySettings},
        metrics::{MigrationOutcome, StoreMetrics},
    };

    #[derive(Default)]
    struct CountingMetrics {
        mutations: Mutex<Vec<String>>,
        saves_ok: AtomicUsize,
        saves_failed: AtomicUsize,
        degraded: AtomicUsize,
        migrations: Mutex<Vec<MigrationOutcome>>,
    }

    impl StoreMetrics for CountingMetrics {
        fn record_mutation(&self, op: &str) {
            self.mutations.lock().unwrap().push(op.to_string());
        }

        fn record_save(&self, outcome: SaveOutcome) {
            match outcome {
                SaveOutcome::Saved => self.saves_ok.fetch_add(1, Ordering::SeqCst),
                SaveOutcome::Failed => self.saves_failed.fetch_add(1, Ordering::SeqCst),
            };
        }

        fn record_degraded_read(&self) {
            self.degraded.fetch_add(1, Ordering::SeqCst);
        }

        fn record_migration(&self, outcome: MigrationOutcome) {
            self.migrations.lock().unwrap().push(outcome);
        }
    }

    fn mk_store() -> (TagStore, Arc<MemorySettings>) {
        let settings = Arc::new(MemorySettings::new());
        (TagStore::new(settings.clone()), settings)
    }

    fn mk_store_with_legacy(raw: &str) -> (TagStore, Arc<MemorySettings>, Arc<MemoryLegacy>) {
        let settings = Arc::new(MemorySettings::new());
        let legacy = Arc::new(MemoryLegacy::new());
        legacy.set_item(LEGACY_TAGS_KEY, raw);
        let store = TagStore::new(settings.clone()).with_legacy(legacy.clone());
        (store, settings, legacy)
    }

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn untouched_record_has_no_tags() {
        let (store, _) = mk_store();
        assert!(store.get_tags("Lorebook").is_empty());
        assert!(store.load().is_empty());
    }

    #[test]
    fn add_tag_twice_equals_once() {
        let (store, settings) = mk_store();

        assert!(store.add_tag("A", "x"));
        let once = store.get_tags("A");
        assert!(!store.add_tag("A", "x"));

        assert_eq!(store.get_tags("A"), once);
        assert_eq!(once, tags(&["x"]));
        assert_eq!(settings.save_requests(), 1);
    }

    #[test]
    fn add_tag_keeps_insertion_order() {
        let (store, _) = mk_store();
        store.add_tag("A", "zeta");
        store.add_tag("A", "alpha");
        store.add_tag("A", "Zeta");
        assert_eq!(store.get_tags("A"), tags(&["zeta", "alpha", "Zeta"]));
    }

    #[test]
    fn removing_absent_tag_changes_nothing() {
        let (store, settings) = mk_store();
        store.set_tags("A", tags(&["x"]));
        let before = store.load();
        let saves = settings.save_requests();

        assert!(!store.remove_tag("A", "nope"));
        assert!(!store.remove_tag("B", "x"));

        assert_eq!(store.load(), before);
        assert!(store.load().get("B").is_none());
        assert_eq!(settings.save_requests(), saves);
    }

    #[test]
    fn remove_tag_drops_every_occurrence() {
        let (store, _) = mk_store();
        store.set_tags("A", tags(&["x", "y", "x"]));

        assert!(store.remove_tag("A", "x"));
        assert_eq!(store.get_tags("A"), tags(&["y"]));
        assert!(!store.remove_tag("A", "x"));
    }

    #[test]
    fn set_tags_roundtrip() {
        let (store, _) = mk_store();
        let list = tags(&["b", "a", "c"]);
        store.set_tags("A", list.clone());
        assert_eq!(store.get_tags("A"), list);
    }

    #[test]
    fn set_tags_does_not_dedup() {
        let (store, _) = mk_store();
        store.set_tags("A", tags(&["x", "x"]));
        assert_eq!(store.get_tags("A"), tags(&["x", "x"]));
    }

    #[test]
    fn all_tags_is_sorted_union() {
        let (store, _) = mk_store();
        store.set_tags("A", tags(&["x", "y"]));
        store.set_tags("B", tags(&["y", "z"]));
        assert_eq!(store.all_tags(), tags(&["x", "y", "z"]));
    }

    #[test]
    fn persisted_layout_matches_host_format() {
        let (store, settings) = mk_store();
        store.add_tag("Dragons", "fantasy");

        assert_eq!(
            settings.raw(NAMESPACE),
            Some(json!({ "tags": { "Dragons": ["fantasy"] } }))
        );
    }

    #[test]
    fn save_preserves_unknown_namespace_keys() {
        let (store, settings) = mk_store();
        settings.insert_raw(NAMESPACE, json!({ "tags": {}, "collapsed": true }));

        store.add_tag("A", "x");
        assert_eq!(
            settings.raw(NAMESPACE),
            Some(json!({ "tags": { "A": ["x"] }, "collapsed": true }))
        );
    }

    #[test]
    fn missing_default_keys_are_filled_on_access() {
        let (store, settings) = mk_store();
        settings.insert_raw(NAMESPACE, json!({ "collapsed": true }));

        assert!(store.load().is_empty());
        assert_eq!(
            settings.raw(NAMESPACE),
            Some(json!({ "tags": {}, "collapsed": true }))
        );
    }

    #[test]
    fn migration_runs_exactly_once() {
        let (store, _, legacy) = mk_store_with_legacy(r#"{"A":["old"]}"#);

        assert_eq!(store.load().tags_of("A"), ["old"]);

        legacy.set_item(LEGACY_TAGS_KEY, r#"{"A":["new"]}"#);
        assert_eq!(store.load().tags_of("A"), ["old"]);
        assert_eq!(store.initialize().unwrap(), InitOutcome::Existing);
    }

    #[test]
    fn migration_skipped_when_namespace_exists() {
        let (store, settings, _) = mk_store_with_legacy(r#"{"A":["old"]}"#);
        settings.insert_raw(NAMESPACE, json!({ "tags": { "B": ["kept"] } }));

        let map = store.load();
        assert!(map.get("A").is_none());
        assert_eq!(map.tags_of("B"), ["kept"]);
    }

    #[test]
    fn migration_leaves_legacy_value_in_place() {
        let (store, _, legacy) = mk_store_with_legacy(r#"{"A":["old"]}"#);
        store.open();
        assert!(legacy.get_item(LEGACY_TAGS_KEY).unwrap().is_some());
    }

    #[test]
    fn malformed_legacy_aborts_migration() {
        let metrics = Arc::new(CountingMetrics::default());
        let (store, settings, _) = mk_store_with_legacy("{broken");
        let store = store.with_metrics(metrics.clone());

        assert_eq!(
            store.initialize().unwrap(),
            InitOutcome::Created(MigrationOutcome::Aborted)
        );
        assert!(store.load().is_empty());
        assert_eq!(settings.raw(NAMESPACE), Some(json!({ "tags": {} })));
        assert_eq!(
            *metrics.migrations.lock().unwrap(),
            vec![MigrationOutcome::Aborted]
        );
    }

    #[test]
    fn legacy_with_odd_entries_is_adopted_as_is() {
        let (store, settings, _) = mk_store_with_legacy(r#"{"A":["old"],"B":["ok",3]}"#);

        assert_eq!(
            store.initialize().unwrap(),
            InitOutcome::Created(MigrationOutcome::Migrated)
        );
        assert_eq!(store.get_tags("A"), tags(&["old"]));
        assert!(store.get_tags("B").is_empty());
        assert_eq!(
            settings.raw(NAMESPACE),
            Some(json!({ "tags": { "A": ["old"], "B": ["ok", 3] } }))
        );
    }

    #[test]
    fn empty_legacy_value_is_skipped() {
        let (store, _, _) = mk_store_with_legacy("");
        assert_eq!(
            store.initialize().unwrap(),
            InitOutcome::Created(MigrationOutcome::Skipped)
        );
    }

    #[test]
    fn successful_migration_schedules_save() {
        let (store, settings, _) = mk_store_with_legacy(r#"{"A":["old"]}"#);
        assert_eq!(
            store.initialize().unwrap(),
            InitOutcome::Created(MigrationOutcome::Migrated)
        );
        assert_eq!(settings.save_requests(), 1);
    }

    #[test]
    fn unavailable_host_degrades_reads_and_drops_writes() {
        let metrics = Arc::new(CountingMetrics::default());
        let (store, settings) = mk_store();
        let store = store.with_metrics(metrics.clone());
        store.add_tag("A", "x");

        settings.set_unavailable(true);
        assert!(store.get_tags("A").is_empty());
        store.add_tag("A", "y");
        assert!(store.all_tags().is_empty());

        settings.set_unavailable(false);
        assert_eq!(store.get_tags("A"), tags(&["x"]));
        assert!(metrics.degraded.load(Ordering::SeqCst) >= 2);
        assert_eq!(metrics.saves_failed.load(Ordering::SeqCst), 1);
        assert_eq!(metrics.saves_ok.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn open_defers_initialization_when_host_is_down() {
        let (store, settings, _) = mk_store_with_legacy(r#"{"A":["old"]}"#);
        settings.set_unavailable(true);
        let store = store.open();
        assert!(settings.raw(NAMESPACE).is_none());

        settings.set_unavailable(false);
        assert_eq!(store.get_tags("A"), tags(&["old"]));
    }

    #[test]
    fn non_object_mapping_reads_empty_and_next_write_heals() {
        let (store, settings) = mk_store();
        settings.insert_raw(NAMESPACE, json!({ "tags": "garbage" }));

        assert!(store.load().is_empty());
        store.add_tag("A", "x");
        assert_eq!(
            settings.raw(NAMESPACE),
            Some(json!({ "tags": { "A": ["x"] } }))
        );
    }

    #[test]
    fn bad_record_entry_keeps_the_rest_of_the_mapping() {
        let (store, settings) = mk_store();
        settings.insert_raw(NAMESPACE, json!({ "tags": { "A": ["x"], "B": 5 } }));

        assert_eq!(store.get_tags("A"), tags(&["x"]));
        assert!(store.get_tags("B").is_empty());

        assert!(store.add_tag("C", "z"));
        assert_eq!(
            settings.raw(NAMESPACE),
            Some(json!({ "tags": { "A": ["x"], "B": 5, "C": ["z"] } }))
        );

        store.set_tags("B", tags(&["fixed"]));
        assert_eq!(store.get_tags("B"), tags(&["fixed"]));
    }

    #[test]
    fn bulk_add_saves_once_and_counts_changes() {
        let metrics = Arc::new(CountingMetrics::default());
        let (store, settings) = mk_store();
        let store = store.with_metrics(metrics.clone());
        store.set_tags("A", tags(&["x"]));
        let saves = settings.save_requests();

        let changed = store.add_tag_to_many(&["A", "B", "C"], "x");

        assert_eq!(changed, 2);
        assert_eq!(settings.save_requests(), saves + 1);
        assert_eq!(store.get_tags("B"), tags(&["x"]));
        assert_eq!(
            *metrics.mutations.lock().unwrap(),
            vec!["set".to_string(), "bulk_add".to_string()]
        );
    }

    #[test]
    fn bulk_remove_of_common_tag() {
        let (store, _) = mk_store();
        store.set_tags("A", tags(&["x", "y"]));
        store.set_tags("B", tags(&["y", "z"]));
        store.set_tags("C", tags(&["y"]));

        let selected = ["A", "B", "C"];
        assert_eq!(store.common_tags(&selected), tags(&["y"]));

        assert_eq!(store.remove_tag_from_many(&selected, "y"), 3);
        assert_eq!(store.get_tags("A"), tags(&["x"]));
        assert_eq!(store.get_tags("B"), tags(&["z"]));
        assert!(store.get_tags("C").is_empty());
        assert!(store.common_tags(&selected).is_empty());
    }

    #[test]
    fn bulk_remove_without_changes_skips_save() {
        let (store, settings) = mk_store();
        store.set_tags("A", tags(&["x"]));
        let saves = settings.save_requests();

        assert_eq!(store.remove_tag_from_many(&["A", "B"], "nope"), 0);
        assert_eq!(settings.save_requests(), saves);
    }

    #[test]
    fn custom_namespace_is_isolated() {
        let settings = Arc::new(MemorySettings::new());
        let a = TagStore::new(settings.clone()).with_namespace("one");
        let b = TagStore::new(settings.clone()).with_namespace("two");

        a.add_tag("A", "x");
        assert!(b.get_tags("A").is_empty());
        assert_eq!(b.namespace(), "two");
    }
}
