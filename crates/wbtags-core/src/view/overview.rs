use crate::{error::HostError, host::RecordSource, store::TagStore, view::search_records};

/// One line of the tag management list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub name: String,
    pub tags: Vec<String>,
}

/// Records known to `source` matching `query`, each with its tags.
///
/// Rows follow the order reported by the source.
pub fn overview<R>(store: &TagStore, source: &R, query: &str) -> Result<Vec<RecordRow>, HostError>
where
    R: RecordSource + ?Sized,
{
    let names = search_records(&source.record_names()?, query);
    let map = store.load();
    Ok(names
        .into_iter()
        .map(|name| RecordRow {
            tags: map.tags_of(&name).to_vec(),
            name,
        })
        .collect())
}
