use std::collections::BTreeSet;

use crate::store::TagStore;

/// Set of tags currently selected in the filter view.
///
/// A record passes when it carries at least one selected tag.
/// With nothing selected every record passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    active: BTreeSet<String>,
}

impl TagFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            active: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Flip selection of `tag`. Returns `true` if it is selected afterwards.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if self.active.remove(tag) {
            false
        } else {
            self.active.insert(tag.to_string());
            true
        }
    }

    /// Replace the whole selection.
    pub fn set<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.active = tags.into_iter().map(Into::into).collect();
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// `true` when at least one tag is selected.
    pub fn is_active(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn is_selected(&self, tag: &str) -> bool {
        self.active.contains(tag)
    }

    /// Selected tags in ascending order.
    pub fn active(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(String::as_str)
    }

    /// Whether a record carrying `tags` passes the filter.
    pub fn matches<S>(&self, tags: &[S]) -> bool
    where
        S: AsRef<str>,
    {
        !self.is_active() || tags.iter().any(|t| self.active.contains(t.as_ref()))
    }

    /// Records from `records` that pass, in their original order.
    ///
    /// Loads the mapping once for the whole batch.
    pub fn apply<S>(&self, store: &TagStore, records: &[S]) -> Vec<String>
    where
        S: AsRef<str>,
    {
        if !self.is_active() {
            return records.iter().map(|r| r.as_ref().to_string()).collect();
        }
        let map = store.load();
        records
            .iter()
            .map(AsRef::as_ref)
            .filter(|r: &&str| self.matches(map.tags_of(r)))
            .map(str::to_string)
            .collect()
    }
}
