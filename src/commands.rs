//! Editor-exposed user commands.
//!
//! Thin single-shot actions the host wires to its command palette. Their
//! only dependency on the core is record lookup by identity.

use std::sync::Arc;

use crate::engine::ViewMemory;
use crate::host::View;
use crate::types::{identity_of, Span};

impl ViewMemory {
    /// Whether the refold command applies: the active document has a record
    /// with a non-empty previous fold set.
    pub fn refold_enabled(&self, view: &Arc<dyn View>) -> bool {
        if view.file_path().is_none() {
            return false;
        }
        let identity = identity_of(view.as_ref());
        self.store
            .lock()
            .get(&identity)
            .map(|record| !record.previous_folds.is_empty())
            .unwrap_or(false)
    }

    /// Reapply the fold set that the most recent fold overwrite replaced,
    /// then nudge the viewport one unit away and back so the minimap and
    /// gutter pick up the change.
    pub fn refold(&self, view: &Arc<dyn View>) {
        let identity = identity_of(view.as_ref());
        let previous_folds = {
            self.store
                .lock()
                .get(&identity)
                .map(|record| record.previous_folds.clone())
                .unwrap_or_default()
        };
        if previous_folds.is_empty() {
            return;
        }
        view.fold(&previous_folds);

        let animate = self.prefs.use_animations();
        let position = view.viewport_position();
        view.set_viewport_position((position.0 - 1.0, position.1 - 1.0), animate);
        view.set_viewport_position(position, animate);
    }
}

/// Replace the selection with the folded regions themselves.
pub fn select_folded_regions(view: &dyn View) {
    let folds = view.folded_regions();
    if !folds.is_empty() {
        view.set_selections(&folds);
    }
}

/// Replace the selection with the gaps between folded regions. A fold that
/// ends right before a newline swallows that newline into the fold side of
/// the gap.
pub fn select_unfolded_regions(view: &dyn View) {
    let folds = view.folded_regions();
    if folds.is_empty() {
        return;
    }
    let mut spans = Vec::with_capacity(folds.len() + 1);
    let mut previous_end = 0u64;
    for fold in &folds {
        spans.push(Span::new(previous_end, fold.a));
        previous_end = if view.char_at(fold.b) == Some('\n') {
            fold.b + 1
        } else {
            fold.b
        };
    }
    spans.push(Span::new(previous_end, view.size()));
    view.set_selections(&spans);
}

/// Drop the view's color scheme override, falling back to the host default.
pub fn forget_color_scheme(view: &dyn View) {
    view.erase_color_scheme();
}
