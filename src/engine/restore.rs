//! Reapplying recorded state to a freshly opened view.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::host::{is_clone_view, placement_key_of, View};
use crate::types::{identity_of, BOOKMARK_LAYER, CANONICAL_PLACEMENT, MARK_LAYER};

use super::{ViewMemory, LOAD_RETRY_DELAY, SCROLL_REAPPLY_DELAY};

/// What a restore request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Recorded state was applied (possibly partially, under the staleness
    /// guard).
    Applied,
    /// No record exists for the view's identity.
    NoRecord,
    /// The view was restored earlier in this process lifetime.
    AlreadyRestored,
    /// The view does not participate (widget or unnamed buffer).
    Skipped,
    /// The process-wide suppression window is open.
    Suppressed,
    /// The document is still loading; the restore re-runs after a short
    /// delay.
    Deferred,
}

impl ViewMemory {
    /// Restore recorded state onto `view`. Idempotent per view for the
    /// process lifetime: once a view has been restored (or found to have no
    /// record), later calls are no-ops.
    pub fn restore(self: &Arc<Self>, view: &Arc<dyn View>) -> RestoreOutcome {
        if self.restore_suppressed() {
            return RestoreOutcome::Suppressed;
        }
        if view.file_path().is_none() || view.is_widget() {
            return RestoreOutcome::Skipped;
        }
        if self.state.restored.lock().contains(&view.id()) {
            return RestoreOutcome::AlreadyRestored;
        }
        if view.is_loading() {
            let engine = self.clone();
            let pending = view.clone();
            self.host.defer(
                LOAD_RETRY_DELAY,
                Box::new(move || {
                    engine.restore(&pending);
                }),
            );
            return RestoreOutcome::Deferred;
        }

        self.state.restored.lock().insert(view.id());

        let identity = identity_of(view.as_ref());
        let record = { self.store.lock().get(&identity).cloned() };
        let Some(record) = record else {
            log::debug!("restore {identity}: no record");
            return RestoreOutcome::NoRecord;
        };
        log::debug!("restore {identity}");

        let mut was_clone = false;

        // Region offsets are only meaningful while the document still has
        // the recorded size; anything else means it changed outside this
        // editor session.
        if record.size == view.size() {
            if !record.folds.is_empty() {
                view.fold(&record.folds);
            }

            was_clone = is_clone_view(self.host.as_ref(), view.as_ref());
            let allow_clone_selection =
                self.state.allow_clone_selection.load(Ordering::SeqCst);
            if (!record.selections.is_empty() && !was_clone) || allow_clone_selection {
                view.set_selections(&record.selections);
            }

            if !record.marks.is_empty() {
                view.set_regions(MARK_LAYER, &record.marks);
            }
            if !record.bookmarks.is_empty() {
                view.set_regions(BOOKMARK_LAYER, &record.bookmarks);
            }
        }

        if self.prefs.remember_color_scheme(view.as_ref()) {
            if let Some(scheme) = &record.color_scheme {
                if view.color_scheme().as_deref() != Some(scheme.as_str()) {
                    view.set_color_scheme(scheme);
                }
            }
        }

        if self.prefs.remember_syntax(view.as_ref()) {
            if let Some(syntax) = &record.syntax {
                if view.syntax().as_deref() != Some(syntax.as_str())
                    && self.host.syntax_exists(syntax)
                {
                    view.set_syntax(syntax);
                }
            }
        }

        for key in self.prefs.remember_settings_list(view.as_ref()) {
            if let Some(value) = record.setting(&key) {
                view.set_setting(&key, value.clone());
            }
        }

        if self.prefs.restore_scroll(view.as_ref()) {
            let placement_key = placement_key_of(view.as_ref());
            let position = if self.prefs.i_use_cloned_views(view.as_ref()) {
                record
                    .scroll
                    .get(&placement_key)
                    .or_else(|| record.scroll.get(CANONICAL_PLACEMENT))
            } else {
                record.scroll.get(CANONICAL_PLACEMENT)
            };
            if let Some(&position) = position {
                let animate = self.prefs.use_animations();
                view.set_viewport_position(position, animate);
                // The host keeps adjusting the viewport shortly after a
                // load; apply once more after it settles.
                let pending = view.clone();
                self.host.defer(
                    SCROLL_REAPPLY_DELAY,
                    Box::new(move || {
                        pending.set_viewport_position(position, animate);
                    }),
                );
            }
        }

        self.state
            .allow_clone_selection
            .store(was_clone, Ordering::SeqCst);

        RestoreOutcome::Applied
    }
}
