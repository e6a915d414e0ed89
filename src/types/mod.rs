//! All data types for the ViewMemory library.

pub mod error;
pub mod identity;
pub mod record;

pub use error::{VmemError, VmemResult};
pub use identity::{identity_of, Identity, IDENTITY_SETTING_KEY};
pub use record::{CustomSetting, Record, Span};

/// File name of the persisted store under the configured data directory.
pub const STORE_FILE_NAME: &str = "records.bin.gz";

/// Default record cap when `max_database_records` is not configured.
pub const DEFAULT_MAX_RECORDS: usize = 500;

/// Scroll-map key for the canonical (placement-independent) entry.
pub const CANONICAL_PLACEMENT: &str = "0";

/// Region layer the host uses for marks.
pub const MARK_LAYER: &str = "mark";

/// Region layer the host uses for bookmarks.
pub const BOOKMARK_LAYER: &str = "bookmarks";
