//! The data-sync loop body.

use std::sync::Arc;

use crate::engine::{SaveTrigger, ViewMemory, SYNC_LOAD_RETRY_DELAY};
use crate::host::View;
use crate::types::{identity_of, Span, BOOKMARK_LAYER, MARK_LAYER};

use super::FlagGuard;

impl ViewMemory {
    /// One data-sync tick: refresh the focused view's record, then — when
    /// any of the sync preferences is enabled and clones exist — mirror its
    /// bookmarks/marks/folds into every clone whose state differs. An empty
    /// canonical list clears the clone's layer rather than leaving stale
    /// regions behind.
    pub fn sync_data(self: &Arc<Self>, view: Option<Arc<dyn View>>) {
        let view = view.or_else(|| self.state.focused.lock().clone());
        let Some(view) = view else { return };
        if view.is_widget() {
            return;
        }

        let Some(_guard) = FlagGuard::try_acquire(&self.state.data_sync_running) else {
            return;
        };

        if view.is_loading() {
            let engine = self.clone();
            let pending = view.clone();
            self.host.defer(
                SYNC_LOAD_RETRY_DELAY,
                Box::new(move || {
                    engine.sync_data(Some(pending));
                }),
            );
            return;
        }

        self.save(&view, SaveTrigger::Sync);

        let sync_bookmarks = self.prefs.synch_bookmarks(view.as_ref());
        let sync_marks = self.prefs.synch_marks(view.as_ref());
        let sync_folds = self.prefs.synch_folds(view.as_ref());
        if !sync_bookmarks && !sync_marks && !sync_folds {
            return;
        }

        let clones: Vec<Arc<dyn View>> = self
            .host
            .views()
            .into_iter()
            .filter(|other| {
                other.buffer_id() == view.buffer_id() && other.id() != view.id()
            })
            .collect();
        if clones.is_empty() {
            return;
        }

        let identity = identity_of(view.as_ref());
        let record = { self.store.lock().get(&identity).cloned() };
        let Some(record) = record else { return };

        for clone in clones {
            if self.prefs.synch_bookmarks(clone.as_ref()) {
                push_layer(clone.as_ref(), BOOKMARK_LAYER, &record.bookmarks);
            }
            if self.prefs.synch_marks(clone.as_ref()) {
                push_layer(clone.as_ref(), MARK_LAYER, &record.marks);
            }
            if self.prefs.synch_folds(clone.as_ref()) {
                if record.folds.is_empty() {
                    clone.unfold_all();
                } else if clone.folded_regions() != record.folds {
                    clone.unfold_all();
                    clone.fold(&record.folds);
                }
            }
        }
    }
}

fn push_layer(clone: &dyn View, layer: &str, canonical: &[Span]) {
    if canonical.is_empty() {
        clone.erase_regions(layer);
    } else if clone.regions(layer) != canonical {
        clone.erase_regions(layer);
        clone.set_regions(layer, canonical);
    }
}
