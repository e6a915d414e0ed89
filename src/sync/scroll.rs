//! The scroll-sync loop body.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::engine::ViewMemory;
use crate::host::{placement_key_of, View};

use super::FlagGuard;

/// Allowance for the tab bar shadow on views ordered after the focused one;
/// keeps the first synced line readable.
const TAB_SHADOW_PX: f64 = 3.0;

impl ViewMemory {
    /// One scroll-sync tick: propagate the focused view's vertical position
    /// outward to its clones, with one-line-height hysteresis so neighbors
    /// never jitter back. Horizontal offsets are left untouched.
    pub fn sync_scroll(&self) {
        let Some(_guard) = FlagGuard::try_acquire(&self.state.scroll_sync_running) else {
            return;
        };

        let view = { self.state.focused.lock().clone() };
        let Some(view) = view else { return };
        if view.is_loading() || !self.prefs.synch_scroll(view.as_ref()) {
            return;
        }

        // Cheap change probe: skip the tick entirely when the focused view
        // has not moved since last time.
        let fingerprint = format!(
            "{:?}|{:?}|{:?}",
            view.visible_region(),
            view.viewport_position(),
            view.viewport_extent()
        );
        {
            let mut probe = self.state.scroll_probe.lock();
            if probe.0 != Some(view.id()) {
                *probe = (Some(view.id()), String::new());
            }
            if probe.1 == fingerprint {
                return;
            }
            probe.1 = fingerprint;
        }

        // Clones keyed (and therefore ordered) by placement.
        let mut clones: BTreeMap<String, Arc<dyn View>> = BTreeMap::new();
        for other in self.host.views() {
            if !other.is_loading()
                && other.buffer_id() == view.buffer_id()
                && other.id() != view.id()
            {
                clones.insert(placement_key_of(other.as_ref()), other);
            }
        }
        if clones.is_empty() {
            return;
        }

        let own_key = placement_key_of(view.as_ref());
        clones.insert(own_key.clone(), view.clone());
        let keys: Vec<String> = clones.keys().cloned().collect();
        let own_index = keys.iter().position(|key| *key == own_key).unwrap_or(0);

        let line = view.line_height();
        let animate = self.prefs.use_animations();

        // Views placed before the focused one: align their bottom edge to
        // the first visible line, walking outward.
        let mut previous = view.clone();
        for key in keys[..own_index].iter().rev() {
            let current = &clones[key];
            let anchor = previous.line_at(previous.visible_region().a).b;
            let (_, anchor_y) = current.text_to_layout(anchor);
            let (_, viewport_h) = current.viewport_extent();
            let (left, old_top) = current.viewport_position();
            let top = (anchor_y - viewport_h) + line;
            if (old_top - top).abs() >= line {
                current.set_viewport_position((left, top), animate);
            }
            previous = current.clone();
        }

        // Views placed after: align their top edge to the last visible line.
        let mut previous = view.clone();
        for key in &keys[own_index + 1..] {
            let current = &clones[key];
            let anchor = previous.line_at(previous.visible_region().b).a;
            let (_, anchor_y) = current.text_to_layout(anchor);
            let top = anchor_y - TAB_SHADOW_PX;
            let (left, old_top) = current.viewport_position();
            if (old_top - top).abs() >= line {
                current.set_viewport_position((left, top), animate);
            }
            previous = current.clone();
        }
    }
}
