/// Records whose name contains `query`, ignoring case.
///
/// An empty query returns every record. Order is preserved.
pub fn search_records<S>(records: &[S], query: &str) -> Vec<String>
where
    S: AsRef<str>,
{
    let needle = query.to_lowercase();
    records
        .iter()
        .map(AsRef::as_ref)
        .filter(|name: &&str| needle.is_empty() || name.to_lowercase().contains(&needle))
        .map(str::to_string)
        .collect()
}
