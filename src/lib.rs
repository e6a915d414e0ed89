//! ViewMemory — compressed per-document view-state store for editor sessions.
//!
//! Persists scroll position, selections, folds, marks, bookmarks, syntax and
//! color scheme per document identity, restores them when a document is
//! reopened, and keeps clone views of the same buffer loosely in sync through
//! two background polling loops.
//!
//! The crate owns no process lifecycle: everything is driven by the host
//! editor through the lifecycle methods on [`ViewMemory`], with the host
//! itself abstracted behind the [`host::View`] and [`host::Workspace`] traits.
//!
//! Initialization order matters: construct ([`ViewMemory::new`] loads the
//! store, then the preferences), then [`ViewMemory::start`] the sync loops.
//! On teardown, [`ViewMemory::shutdown`] stops the loops and performs a final
//! blocking flush.

pub mod commands;
pub mod engine;
pub mod format;
pub mod host;
pub mod prefs;
pub mod store;
pub mod sync;
pub mod types;

// Re-export commonly used types at the crate root
pub use engine::{RestoreOutcome, SaveOutcome, SaveTrigger, StoreConfig, ViewMemory};
pub use format::{StoreReader, StoreWriter};
pub use host::{BufferId, Placement, SettingsSource, View, ViewId, Workspace};
pub use prefs::{PrefValues, Preferences, TypeOverrides};
pub use store::RecordStore;
pub use types::{
    CustomSetting, Identity, Record, Span, VmemError, VmemResult, BOOKMARK_LAYER,
    CANONICAL_PLACEMENT, DEFAULT_MAX_RECORDS, MARK_LAYER, STORE_FILE_NAME,
};
