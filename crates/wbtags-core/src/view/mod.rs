//! Read-side helpers used by the tag filter and tag management views.
mod filter;
pub use filter::TagFilter;

mod search;
pub use search::search_records;

mod overview;
pub use overview::{RecordRow, overview};
