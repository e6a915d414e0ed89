//! Snapshotting live view state into the record store.

use std::sync::Arc;

use crate::host::{placement_key_of, View};
use crate::types::{identity_of, CustomSetting, BOOKMARK_LAYER, CANONICAL_PLACEMENT, MARK_LAYER};

use super::{ViewMemory, LOAD_RETRY_DELAY};

/// Which lifecycle event requested the save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTrigger {
    /// Focus left the view. Always flushes, because the host does not
    /// reliably deliver any later event before process exit.
    Deactivated,
    /// The view is about to close.
    PreClose,
    /// The document is about to be written to disk.
    PreSave,
    /// The data-sync loop refreshing the focused view's record.
    Sync,
}

/// What a save request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The record changed (or the trigger was a deactivation) and a flush
    /// was requested.
    Persisted,
    /// Snapshot taken, nothing differed, no flush requested.
    Unchanged,
    /// The view does not participate (widget or unnamed buffer), or it was
    /// already detached.
    Skipped,
    /// The document is still loading; the save re-runs after a short delay.
    Deferred,
}

impl ViewMemory {
    /// Capture a full snapshot of `view` into its record. Fire-and-forget
    /// for the caller: flushing happens asynchronously when the snapshot
    /// turned out to be a real change.
    pub fn save(self: &Arc<Self>, view: &Arc<dyn View>, trigger: SaveTrigger) -> SaveOutcome {
        if view.file_path().is_none() || view.is_widget() {
            return SaveOutcome::Skipped;
        }
        if view.is_loading() {
            let engine = self.clone();
            let pending = view.clone();
            self.host.defer(
                LOAD_RETRY_DELAY,
                Box::new(move || {
                    engine.save(&pending, trigger);
                }),
            );
            return SaveOutcome::Deferred;
        }

        let identity = identity_of(view.as_ref());
        let placement_key = placement_key_of(view.as_ref());
        log::debug!("save {identity} ({trigger:?}) placement {placement_key}");

        let changed = {
            let mut store = self.store.lock();
            let record = store.record_mut(&identity);
            let before = record.clone();

            record.size = view.size();

            let position = view.viewport_position();
            record.scroll.insert(placement_key, position);
            record.scroll.insert(CANONICAL_PLACEMENT.to_owned(), position);

            record.selections = view.selections();
            record.marks = view.regions(MARK_LAYER);
            record.bookmarks = view.regions(BOOKMARK_LAYER);

            // Snapshot the outgoing folds before overwriting, so the refold
            // command can bring them back. Only a non-empty set qualifies.
            if !record.folds.is_empty() {
                record.previous_folds = record.folds.clone();
            }
            record.folds = view.folded_regions();

            if self.prefs.remember_color_scheme(view.as_ref()) {
                record.color_scheme = view.color_scheme();
            }
            if self.prefs.remember_syntax(view.as_ref()) {
                record.syntax = view.syntax();
            }

            record.settings = self
                .prefs
                .remember_settings_list(view.as_ref())
                .into_iter()
                .filter_map(|key| {
                    view.setting(&key)
                        .map(|value| CustomSetting { key, value })
                })
                .collect();

            let changed = *record != before;
            if changed || trigger == SaveTrigger::Deactivated {
                store.touch(&identity);
            }
            changed
        };

        if changed || trigger == SaveTrigger::Deactivated {
            self.request_flush();
            SaveOutcome::Persisted
        } else {
            SaveOutcome::Unchanged
        }
    }
}
