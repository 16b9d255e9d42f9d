mod domain;
pub use domain::{LEGACY_TAGS_KEY, NAMESPACE, TAGS_KEY};
pub use domain::{RecordName, Tag, TagList, TagMap, capture_tag};

mod error;
pub use error::{ModelError, ModelResult};

mod layout;
pub use layout::{
    ExtensionSettings, adopt_legacy, merge_defaults, parse_legacy, read_tags, unreadable_records,
    write_tags,
};
