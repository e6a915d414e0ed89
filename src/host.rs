//! The host-editor boundary.
//!
//! Everything the core needs from the editor is expressed through these
//! traits; the host implements them over its own view, window and settings
//! primitives and drives the core through the lifecycle methods on
//! [`crate::ViewMemory`].

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::types::Span;

/// Process-unique handle of one open view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

/// Handle of the underlying text buffer. Clone views share a `BufferId`
/// while having distinct [`ViewId`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

/// Handle of an editor window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

/// Where a view sits: owning window plus its slot within that window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placement {
    pub window: WindowId,
    pub group: i32,
    pub index: i32,
}

impl Placement {
    pub fn new(window: WindowId, group: i32, index: i32) -> Self {
        Self {
            window,
            group,
            index,
        }
    }

    /// Scroll-map key for this placement.
    pub fn key(&self) -> String {
        format!("{}:{}:{}", self.window.0, self.group, self.index)
    }
}

/// One open view onto a document, with the accessor set the reconciliation
/// engine and the synchronizer need. All offsets are character offsets; all
/// geometry is in layout pixels.
pub trait View: Send + Sync {
    fn id(&self) -> ViewId;
    fn buffer_id(&self) -> BufferId;

    /// Backing file path; `None` for unnamed buffers.
    fn file_path(&self) -> Option<PathBuf>;

    /// Document size in characters.
    fn size(&self) -> u64;

    /// True while the document is still being loaded asynchronously.
    fn is_loading(&self) -> bool;

    /// True for input panels, quick panels and other non-document widgets.
    fn is_widget(&self) -> bool;

    /// True for scratch buffers.
    fn is_scratch(&self) -> bool;

    /// Current placement, or `None` once the view is detached from its
    /// window (mid-close).
    fn placement(&self) -> Option<Placement>;

    fn selections(&self) -> Vec<Span>;
    fn set_selections(&self, spans: &[Span]);

    /// Regions of a named layer (marks, bookmarks).
    fn regions(&self, layer: &str) -> Vec<Span>;
    fn set_regions(&self, layer: &str, spans: &[Span]);
    fn erase_regions(&self, layer: &str);

    fn folded_regions(&self) -> Vec<Span>;
    fn fold(&self, spans: &[Span]);
    fn unfold_all(&self);

    /// Viewport offset `(x, y)` in layout pixels.
    fn viewport_position(&self) -> (f64, f64);
    fn set_viewport_position(&self, position: (f64, f64), animate: bool);

    /// Viewport size `(width, height)` in layout pixels.
    fn viewport_extent(&self) -> (f64, f64);

    fn line_height(&self) -> f64;

    /// The region of the document currently visible in the viewport.
    fn visible_region(&self) -> Span;

    /// The full line containing `point`.
    fn line_at(&self, point: u64) -> Span;

    /// Layout position `(x, y)` of a character offset.
    fn text_to_layout(&self, point: u64) -> (f64, f64);

    /// `(row, col)` of a character offset.
    fn rowcol(&self, point: u64) -> (u64, u64);

    /// Character offset of `(row, col)`.
    fn text_point(&self, row: u64, col: u64) -> u64;

    /// Scroll so that `point` is vertically centered.
    fn show_at_center(&self, point: u64);

    /// The character at `point`, if any.
    fn char_at(&self, point: u64) -> Option<char>;

    /// Per-document settings, also used by the core to cache derived values
    /// on the view.
    fn setting(&self, key: &str) -> Option<Value>;
    fn set_setting(&self, key: &str, value: Value);
    fn erase_setting(&self, key: &str);

    fn syntax(&self) -> Option<String>;
    fn set_syntax(&self, syntax: &str);

    fn color_scheme(&self) -> Option<String>;
    fn set_color_scheme(&self, scheme: &str);
    fn erase_color_scheme(&self);
}

/// The host application: view enumeration, focus, resource queries, and the
/// timer used for deferred retries.
pub trait Workspace: Send + Sync {
    /// All open views across all windows.
    fn views(&self) -> Vec<Arc<dyn View>>;

    /// The currently focused view, if any.
    fn active_view(&self) -> Option<Arc<dyn View>>;

    /// Whether a recorded syntax definition still exists on disk.
    fn syntax_exists(&self, syntax: &str) -> bool;

    /// Run `task` after `delay`, off the current call stack. Used for the
    /// bounded "document still loading" retries and the late scroll
    /// reapplication; tasks must never block.
    fn defer(&self, delay: Duration, task: Box<dyn FnOnce() + Send>);
}

/// The host's reloadable configuration object.
///
/// `section` exposes per-document-type override tables keyed by type tag.
/// The host is expected to call [`crate::ViewMemory::reload_preferences`]
/// from its settings-change notification (push model; the core never polls).
pub trait SettingsSource: Send + Sync {
    /// Top-level value for `key`, if configured.
    fn get(&self, key: &str) -> Option<Value>;

    /// Per-document-type section, if configured.
    fn section(&self, name: &str) -> Option<Value>;
}

/// Whether any other open view shares `view`'s buffer.
pub fn is_clone_view(workspace: &dyn Workspace, view: &dyn View) -> bool {
    workspace
        .views()
        .iter()
        .any(|other| other.buffer_id() == view.buffer_id() && other.id() != view.id())
}

/// Scroll-map key for a view: its placement key, or the canonical key when
/// the view is no longer attached to a window.
pub fn placement_key_of(view: &dyn View) -> String {
    view.placement()
        .map(|placement| placement.key())
        .unwrap_or_else(|| crate::types::CANONICAL_PLACEMENT.to_owned())
}
