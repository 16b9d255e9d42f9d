use serde::{Deserialize, Deserializer, Serialize};

#[cfg(feature = "schema")]
use schemars::JsonSchema;

/// Ordered list of tags attached to one record.
///
/// Keeps insertion order. [`TagList::insert`] refuses duplicates, while
/// [`TagList::from`] stores whatever it is given (wholesale replacement does not dedup).
/// A persisted `null` reads as an empty list.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(transparent)]
pub struct TagList(Vec<String>);

impl TagList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Exact, case-sensitive membership check.
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    /// Append `tag` unless it is already present.
    ///
    /// Returns `true` if the list changed.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    /// Remove every occurrence of `tag`.
    ///
    /// Returns `true` if the list changed.
    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|t| t != tag);
        self.0.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for TagList {
    fn from(tags: Vec<String>) -> Self {
        Self(tags)
    }
}

impl From<TagList> for Vec<String> {
    fn from(list: TagList) -> Self {
        list.0
    }
}

impl<S: Into<String>> FromIterator<S> for TagList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'de> Deserialize<'de> for TagList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tags = Option::<Vec<String>>::deserialize(deserializer)?;
        Ok(Self(tags.unwrap_or_default()))
    }
}
