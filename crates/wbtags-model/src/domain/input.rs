/// Normalize a tag typed by a user.
///
/// Surrounding whitespace is trimmed and empty input is rejected.
/// This is the only normalization applied to tags; stored tags are compared exactly.
pub fn capture_tag(raw: &str) -> Option<String> {
    let tag = raw.trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_string())
    }
}
