//! The state reconciliation engine.
//!
//! [`ViewMemory`] owns the loaded record store, the preference resolver and
//! the runtime bookkeeping, and exposes the lifecycle surface the host
//! editor drives. The save/restore/typewriter operations live in the
//! sibling modules of this one.

mod restore;
mod save;
mod typewriter;

pub use restore::RestoreOutcome;
pub use save::{SaveOutcome, SaveTrigger};

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::format::{StoreReader, StoreWriter};
use crate::host::{SettingsSource, View, ViewId, Workspace};
use crate::prefs::Preferences;
use crate::store::RecordStore;
use crate::types::{Identity, Record, STORE_FILE_NAME};

/// Retry delay while a document is still loading.
pub(crate) const LOAD_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Longer retry delay used by the data-sync path.
pub(crate) const SYNC_LOAD_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Delay before the restored scroll position is applied a second time, to
/// defeat the host's own late scroll adjustments.
pub(crate) const SCROLL_REAPPLY_DELAY: Duration = Duration::from_millis(50);

/// How long restoration stays suppressed after the host is seen placing the
/// caret itself (goto-anything, `file:row:col` opens).
pub(crate) const RESTORE_SUPPRESS_WINDOW: Duration = Duration::from_secs(3);

/// Store location configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the compressed store file.
    pub store_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let store_path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("view-memory")
            .join(STORE_FILE_NAME);
        Self { store_path }
    }
}

/// Mutable runtime bookkeeping shared between the lifecycle callbacks and
/// the background loops.
pub(crate) struct RuntimeState {
    /// Views already restored in this process lifetime.
    pub(crate) restored: Mutex<HashSet<ViewId>>,
    /// One-shot flag permitting selection restore on a clone view; armed by
    /// the host's clone command and rearmed after each clone restore.
    pub(crate) allow_clone_selection: AtomicBool,
    /// Deadline until which restoration is suppressed; auto-clears by
    /// comparison, no timer involved.
    pub(crate) restore_suppressed_until: Mutex<Option<Instant>>,
    /// Tag of the most recently deactivated view.
    pub(crate) last_focused_tag: Mutex<String>,
    /// Most recently focused non-widget view; the target of both loops.
    pub(crate) focused: Mutex<Option<Arc<dyn View>>>,
    /// Scroll-sync change probe: last focused view and its fingerprint.
    pub(crate) scroll_probe: Mutex<(Option<ViewId>, String)>,
    /// Single-flight flags.
    pub(crate) flush_running: AtomicBool,
    pub(crate) data_sync_running: AtomicBool,
    pub(crate) scroll_sync_running: AtomicBool,
    /// Set once at teardown; the loops exit on their next tick.
    pub(crate) shutdown: AtomicBool,
}

impl RuntimeState {
    fn new() -> Self {
        Self {
            restored: Mutex::new(HashSet::new()),
            allow_clone_selection: AtomicBool::new(false),
            restore_suppressed_until: Mutex::new(None),
            last_focused_tag: Mutex::new(String::new()),
            focused: Mutex::new(None),
            scroll_probe: Mutex::new((None, String::new())),
            flush_running: AtomicBool::new(false),
            data_sync_running: AtomicBool::new(false),
            scroll_sync_running: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
        }
    }
}

/// The process-wide context: record store, preferences, runtime state and
/// the lifecycle surface the host drives.
pub struct ViewMemory {
    pub(crate) host: Arc<dyn Workspace>,
    pub(crate) prefs: Preferences,
    pub(crate) store: Mutex<RecordStore>,
    pub(crate) config: StoreConfig,
    pub(crate) state: RuntimeState,
    loops: Mutex<Vec<JoinHandle<()>>>,
}

impl ViewMemory {
    /// Load the store and the preferences. Call [`Self::start`] afterwards
    /// to launch the sync loops.
    pub fn new(
        host: Arc<dyn Workspace>,
        source: Arc<dyn SettingsSource>,
        config: StoreConfig,
    ) -> Arc<Self> {
        let store = StoreReader::load_or_default(&config.store_path);
        let prefs = Preferences::new(source);
        Arc::new(Self {
            host,
            prefs,
            store: Mutex::new(store),
            config,
            state: RuntimeState::new(),
            loops: Mutex::new(Vec::new()),
        })
    }

    /// Launch the scroll-sync and data-sync loops. Idempotent.
    pub fn start(self: &Arc<Self>) {
        let mut loops = self.loops.lock();
        if !loops.is_empty() {
            return;
        }
        loops.extend(crate::sync::spawn_loops(self));
    }

    /// Stop the loops, wait out any in-flight flush, and flush once more
    /// so nothing recorded since the last flush is lost.
    pub fn shutdown(&self) {
        self.state.shutdown.store(true, Ordering::SeqCst);
        for handle in self.loops.lock().drain(..) {
            let _ = handle.join();
        }
        let deadline = Instant::now() + Duration::from_secs(2);
        while self.state.flush_running.load(Ordering::SeqCst) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        self.flush_now();
    }

    /// Re-read preferences from the raw settings source. The host calls
    /// this from its settings-change notification.
    pub fn reload_preferences(&self) {
        self.prefs.reload();
    }

    /// Shared preference resolver.
    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Snapshot of the record for `identity`, if one exists. Does not touch
    /// recency.
    pub fn record(&self, identity: &Identity) -> Option<Record> {
        self.store.lock().get(identity).cloned()
    }

    /// Number of records currently held in memory.
    pub fn record_count(&self) -> usize {
        self.store.lock().len()
    }

    // ---- lifecycle surface -------------------------------------------------

    /// Document finished opening. Restores unless the caret was already
    /// placed by the host, in which case restoration is suppressed for a
    /// fixed window.
    pub fn on_load(self: &Arc<Self>, view: &Arc<dyn View>) -> RestoreOutcome {
        if self.restore_allowed_for(view) {
            self.restore(view)
        } else {
            self.suppress_restoring(RESTORE_SUPPRESS_WINDOW);
            RestoreOutcome::Suppressed
        }
    }

    /// Document reloaded from disk underneath its view.
    pub fn on_reload(self: &Arc<Self>, view: &Arc<dyn View>) -> RestoreOutcome {
        self.restore(view)
    }

    /// A clone view was created. The host may deliver the pre-clone handle
    /// here, so the freshly focused view is preferred when one exists.
    pub fn on_clone(self: &Arc<Self>, view: &Arc<dyn View>) -> RestoreOutcome {
        let target = self.host.active_view().unwrap_or_else(|| view.clone());
        self.restore(&target)
    }

    /// Focus moved onto a view. Tracks the loop target only; restoration
    /// happens on load.
    pub fn on_activated(&self, view: &Arc<dyn View>) {
        if !view.is_widget() {
            *self.state.focused.lock() = Some(view.clone());
        }
    }

    /// Focus left a view. The one event the host does not reliably deliver
    /// at process exit, so it always persists defensively; skipped when the
    /// view is already detached from its window (closing).
    pub fn on_deactivated(self: &Arc<Self>, view: &Arc<dyn View>) -> SaveOutcome {
        *self.state.last_focused_tag.lock() = format!(
            "{:?}-{}",
            view.file_path(),
            view.is_widget()
        );
        if view.placement().is_none() {
            return SaveOutcome::Skipped;
        }
        let outcome = self.save(view, SaveTrigger::Deactivated);
        self.sync_data(Some(view.clone()));
        outcome
    }

    /// View about to close. Background tabs never see a deactivate, so this
    /// is their last chance to persist.
    pub fn on_pre_close(self: &Arc<Self>, view: &Arc<dyn View>) -> SaveOutcome {
        self.save(view, SaveTrigger::PreClose)
    }

    /// Document about to be written to disk.
    pub fn on_pre_save(self: &Arc<Self>, view: &Arc<dyn View>) -> SaveOutcome {
        self.save(view, SaveTrigger::PreSave)
    }

    /// Buffer contents changed; drives typewriter scrolling.
    pub fn on_modified(&self, view: &Arc<dyn View>) {
        self.typewriter_scroll(view);
    }

    /// A text command finished; caret movement commands also drive
    /// typewriter scrolling when the follow preference is enabled.
    pub fn on_post_text_command(
        &self,
        view: &Arc<dyn View>,
        command: &str,
        _args: Option<&serde_json::Value>,
    ) {
        if (command == "move" || command == "move_to")
            && self.prefs.typewriter_scrolling_follow_cursor_movement(view.as_ref())
        {
            self.typewriter_scroll(view);
        }
    }

    /// A window command is about to run. The clone command arms the
    /// one-shot flag that lets the next restore apply selections to a clone
    /// view.
    pub fn on_window_command(&self, command: &str, _args: Option<&serde_json::Value>) {
        if command == "clone_file" {
            self.state
                .allow_clone_selection
                .store(true, Ordering::SeqCst);
        }
    }

    // ---- flush -------------------------------------------------------------

    /// Request an asynchronous flush. Single-flight: a request that arrives
    /// while a flush is in progress is dropped, and the running flush picks
    /// up whatever the store holds when it serializes.
    pub(crate) fn request_flush(self: &Arc<Self>) {
        if self.state.flush_running.swap(true, Ordering::SeqCst) {
            return;
        }
        let engine = self.clone();
        std::thread::spawn(move || {
            engine.flush_now();
            engine.state.flush_running.store(false, Ordering::SeqCst);
        });
    }

    /// Evict beyond the record cap and write the store out, best-effort.
    pub(crate) fn flush_now(&self) {
        let snapshot = {
            let mut store = self.store.lock();
            let evicted = store.evict_to(self.prefs.max_database_records());
            if evicted > 0 {
                log::debug!("evicted {evicted} least-recently-written records");
            }
            store.clone()
        };
        if let Err(err) = StoreWriter::write_to_file(&snapshot, &self.config.store_path) {
            log::warn!("store flush failed: {err}");
        }
    }

    // ---- restoration suppression ------------------------------------------

    /// Restoration is allowed unless the host already moved the caret past
    /// the buffer start (goto-anything, `file:row:col` command line opens).
    fn restore_allowed_for(&self, view: &Arc<dyn View>) -> bool {
        view.selections()
            .first()
            .map(|span| span.end() < 1)
            .unwrap_or(true)
    }

    /// Suppress restoration process-wide for `window`.
    pub(crate) fn suppress_restoring(&self, window: Duration) {
        *self.state.restore_suppressed_until.lock() = Some(Instant::now() + window);
    }

    /// Whether the suppression window is still open. Expired deadlines are
    /// cleared on the way out.
    pub(crate) fn restore_suppressed(&self) -> bool {
        let mut deadline = self.state.restore_suppressed_until.lock();
        match *deadline {
            Some(until) if Instant::now() < until => true,
            Some(_) => {
                *deadline = None;
                false
            }
            None => false,
        }
    }
}
