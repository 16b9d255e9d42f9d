mod tag_list;
pub use tag_list::TagList;

mod tag_map;
pub use tag_map::TagMap;

mod input;
pub use input::capture_tag;

mod constants;
pub use constants::{LEGACY_TAGS_KEY, NAMESPACE, TAGS_KEY};

/// Name of a record managed by the host (a worldbook).
///
/// Case-sensitive and compared byte for byte.
pub type RecordName = String;

/// Free-form tag label attached to a record.
pub type Tag = String;
