//! File-backed host adapters for the tag store.
//!
//! - [`FileSettingsHost`]: JSON settings file held in memory, written back on flush.
//! - [`Debouncer`]: coalesces save requests into delayed flushes on a tokio task.
//! - [`FileLegacyStore`]: read-only flat JSON object standing in for the old storage slot.
//! - [`DirRecordSource`]: record names taken from the `*.json` files of a worlds directory.
mod config;
pub use config::HostConfig;

mod error;
pub use error::HostIoError;

mod debounce;
pub use debounce::Debouncer;

mod settings;
pub use settings::FileSettingsHost;

mod legacy;
pub use legacy::FileLegacyStore;

mod records;
pub use records::DirRecordSource;
