//! Typewriter scrolling: keep the caret line vertically centered.

use std::sync::Arc;

use crate::host::View;

use super::ViewMemory;

impl ViewMemory {
    /// Recenter the viewport on the caret's line, shifted up by the
    /// configured offset, preserving the horizontal scroll exactly. Pure
    /// view geometry; the store is not involved.
    pub(crate) fn typewriter_scroll(&self, view: &Arc<dyn View>) {
        if view.is_widget() || view.is_scratch() {
            return;
        }
        let selections = view.selections();
        if selections.len() != 1 {
            return;
        }
        if !self.prefs.typewriter_scrolling(view.as_ref()) {
            return;
        }

        let (row, col) = view.rowcol(selections[0].b);
        let shift = self.prefs.typewriter_scrolling_shift(view.as_ref()).max(0) as u64;
        let row = row.saturating_sub(shift);
        let point = view.text_point(row, col);

        let before = view.viewport_position();
        view.show_at_center(point);
        let after = view.viewport_position();
        // Only the vertical offset may change.
        view.set_viewport_position((before.0, after.1), self.prefs.use_animations());
    }
}
