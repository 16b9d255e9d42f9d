//! Namespace initialization and the one-time legacy migration.
//!
//! The existence of the namespace is the migration marker: once it has been
//! written, the legacy store is never consulted again.
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use wbtags_model::{ExtensionSettings, LEGACY_TAGS_KEY, adopt_legacy, merge_defaults};

use crate::{
    error::StoreResult,
    host::{LegacyStore, SettingsHost},
    metrics::{MigrationOutcome, StoreMetrics},
};

/// What [`crate::store::TagStore::initialize`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The namespace already existed; migration was not attempted.
    Existing,
    /// The namespace was created during this call.
    Created(MigrationOutcome),
}

/// Return the namespace object, creating it (and migrating) when it does not exist yet.
///
/// Existing namespaces get missing default keys filled in; other keys are preserved.
pub(crate) fn ensure_namespace(
    settings: &dyn SettingsHost,
    legacy: Option<&dyn LegacyStore>,
    namespace: &str,
    metrics: &dyn StoreMetrics,
) -> StoreResult<(Map<String, Value>, InitOutcome)> {
    if let Some(mut ns) = settings.read_namespace(namespace)? {
        if merge_defaults(&mut ns)? {
            debug!(namespace, "filled missing default settings keys");
            settings.write_namespace(namespace, ns.clone())?;
        }
        return Ok((ns, InitOutcome::Existing));
    }

    let mut ns = ExtensionSettings::default_object()?;
    let outcome = match legacy {
        Some(legacy) => migrate_legacy(legacy, &mut ns),
        None => MigrationOutcome::Skipped,
    };
    settings.write_namespace(namespace, ns.clone())?;
    metrics.record_migration(outcome);
    debug!(namespace, outcome = outcome.as_label(), "namespace created");

    if outcome == MigrationOutcome::Migrated {
        if let Err(e) = settings.schedule_save() {
            warn!(error = %e, "could not schedule save of migrated tags");
        }
    }
    Ok((ns, InitOutcome::Created(outcome)))
}

/// Copy the legacy mapping into `ns` as it is. The legacy value is left in place.
///
/// Only a value that is not JSON at all aborts the migration.
fn migrate_legacy(legacy: &dyn LegacyStore, ns: &mut Map<String, Value>) -> MigrationOutcome {
    let raw = match legacy.get_item(LEGACY_TAGS_KEY) {
        Ok(Some(raw)) if !raw.is_empty() => raw,
        Ok(_) => return MigrationOutcome::Skipped,
        Err(e) => {
            warn!(error = %e, "legacy store unreadable; starting with no tags");
            return MigrationOutcome::Aborted;
        }
    };

    match adopt_legacy(ns, &raw) {
        Ok(records) => {
            info!(records, "migrated tags from legacy store");
            MigrationOutcome::Migrated
        }
        Err(e) => {
            warn!(error = %e, "legacy migration aborted; starting with no tags");
            MigrationOutcome::Aborted
        }
    }
}
