//! Well-known keys of the persisted layout.

/// Namespace under which the tag settings live in the host settings object.
pub const NAMESPACE: &str = "worldbook_tags_manager";

/// Key of the record → tags mapping inside the namespace object.
pub const TAGS_KEY: &str = "tags";

/// Key under which the deprecated flat store kept the whole mapping as one JSON string.
///
/// Read once during migration and never written or deleted.
pub const LEGACY_TAGS_KEY: &str = "worldbook_tags_v1";
