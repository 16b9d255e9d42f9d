use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

#[cfg(feature = "schema")]
use schemars::JsonSchema;

use crate::domain::TagList;

/// Mapping from record name to its ordered tag list.
///
/// An absent record and a record with an empty list are equivalent for every read.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(transparent)]
pub struct TagMap(BTreeMap<String, TagList>);

impl TagMap {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of records present in the mapping (including ones with empty lists).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, record: &str) -> Option<&TagList> {
        self.0.get(record)
    }

    /// Tags of `record`, or an empty slice when the record is unknown.
    pub fn tags_of(&self, record: &str) -> &[String] {
        self.0.get(record).map(TagList::as_slice).unwrap_or(&[])
    }

    /// Replace the whole list of `record`.
    pub fn set<K>(&mut self, record: K, tags: TagList) -> &mut Self
    where
        K: Into<String>,
    {
        self.0.insert(record.into(), tags);
        self
    }

    /// Mutable list of `record`, created empty if missing.
    pub fn entry(&mut self, record: &str) -> &mut TagList {
        self.0.entry(record.to_string()).or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagList)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every distinct tag used by any record, in ascending byte order.
    pub fn distinct_tags(&self) -> Vec<String> {
        self.0
            .values()
            .flat_map(|list| list.iter())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Tags shared by every record in `records`.
    ///
    /// The result follows the order of the first record's list. It is empty when
    /// `records` is empty, when any record has no tags, or when nothing is shared.
    pub fn common_tags<S>(&self, records: &[S]) -> Vec<String>
    where
        S: AsRef<str>,
    {
        let Some((first, rest)) = records.split_first() else {
            return Vec::new();
        };

        let mut common: Vec<&String> = self.tags_of(first.as_ref()).iter().collect();
        for record in rest {
            if common.is_empty() {
                break;
            }
            let tags = self.tags_of(record.as_ref());
            common.retain(|t| tags.contains(*t));
        }

        let mut seen = BTreeSet::new();
        common
            .into_iter()
            .filter(|t| seen.insert(*t))
            .cloned()
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for TagMap
where
    K: Into<String>,
    V: Into<TagList>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
