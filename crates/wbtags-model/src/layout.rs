//! Persisted layout of the extension namespace.
//!
//! The namespace is an open JSON object owned by the host. Only the keys of
//! [`ExtensionSettings`] are interpreted here; any other key is left untouched.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[cfg(feature = "schema")]
use schemars::JsonSchema;

use crate::{
    domain::{TAGS_KEY, TagList, TagMap},
    error::{ModelError, ModelResult},
};

/// Typed view of the namespace defaults.
///
/// Serialized form: `{ "tags": { "<record>": ["tag", ...] } }`.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(default)]
pub struct ExtensionSettings {
    /// Record name to tag list.
    pub tags: TagMap,
}

impl ExtensionSettings {
    /// Defaults as a raw namespace object.
    pub fn default_object() -> ModelResult<Map<String, Value>> {
        match serde_json::to_value(Self::default()) {
            Ok(Value::Object(obj)) => Ok(obj),
            Ok(other) => Err(ModelError::Encode(format!(
                "defaults must encode to an object, got {other}"
            ))),
            Err(e) => Err(ModelError::Encode(e.to_string())),
        }
    }
}

/// Insert every default key missing from `ns`, leaving existing keys as they are.
///
/// Returns `true` if anything was inserted.
pub fn merge_defaults(ns: &mut Map<String, Value>) -> ModelResult<bool> {
    let mut changed = false;
    for (key, value) in ExtensionSettings::default_object()? {
        if !ns.contains_key(&key) {
            ns.insert(key, value);
            changed = true;
        }
    }
    Ok(changed)
}

/// Decode the tag mapping stored in `ns`.
///
/// A missing, `null` or non-object value is an empty mapping. Records whose
/// value is not a list of strings are left out; [`write_tags`] keeps them as they are.
pub fn read_tags(ns: &Map<String, Value>) -> TagMap {
    let Some(Value::Object(entries)) = ns.get(TAGS_KEY) else {
        return TagMap::new();
    };
    entries
        .iter()
        .filter_map(|(record, value)| decode_list(value).map(|list| (record.as_str(), list)))
        .collect()
}

/// Records stored in `ns` whose value [`read_tags`] cannot decode.
pub fn unreadable_records(ns: &Map<String, Value>) -> Vec<&str> {
    match ns.get(TAGS_KEY) {
        Some(Value::Object(entries)) => entries
            .iter()
            .filter(|(_, value)| decode_list(value).is_none())
            .map(|(record, _)| record.as_str())
            .collect(),
        _ => Vec::new(),
    }
}

/// Store `tags` into `ns`, replacing the previous mapping.
///
/// Entries of the previous mapping that do not decode, and that `tags` does
/// not mention, are carried over untouched.
pub fn write_tags(ns: &mut Map<String, Value>, tags: &TagMap) -> ModelResult<()> {
    let mut entries = match serde_json::to_value(tags) {
        Ok(Value::Object(entries)) => entries,
        Ok(other) => {
            return Err(ModelError::Encode(format!(
                "tag mapping must encode to an object, got {other}"
            )));
        }
        Err(e) => return Err(ModelError::Encode(e.to_string())),
    };

    if let Some(Value::Object(previous)) = ns.get(TAGS_KEY) {
        for (record, value) in previous {
            if !entries.contains_key(record) && decode_list(value).is_none() {
                entries.insert(record.clone(), value.clone());
            }
        }
    }
    ns.insert(TAGS_KEY.to_string(), Value::Object(entries));
    Ok(())
}

/// Parse the single value kept by the legacy flat store.
///
/// Any well-formed JSON is accepted; its shape is not checked.
pub fn parse_legacy(raw: &str) -> ModelResult<Value> {
    serde_json::from_str(raw).map_err(|e| ModelError::MalformedLegacy(e.to_string()))
}

/// Adopt the legacy value as the tag mapping of `ns`, verbatim.
///
/// Returns the number of records it holds.
pub fn adopt_legacy(ns: &mut Map<String, Value>, raw: &str) -> ModelResult<usize> {
    let value = parse_legacy(raw)?;
    let records = value.as_object().map_or(0, Map::len);
    ns.insert(TAGS_KEY.to_string(), value);
    Ok(records)
}

fn decode_list(value: &Value) -> Option<TagList> {
    TagList::deserialize(value).ok()
}
