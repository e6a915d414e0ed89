//! The persisted state bundle for one document identity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A half-open region of the document, in character offsets.
///
/// `a` and `b` preserve direction: for a selection made backwards, `b` (the
/// caret end) is smaller than `a`. Region layers and folds are stored the
/// way the host reported them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub a: u64,
    pub b: u64,
}

impl Span {
    pub fn new(a: u64, b: u64) -> Self {
        Self { a, b }
    }

    /// The lower of the two endpoints.
    pub fn begin(&self) -> u64 {
        self.a.min(self.b)
    }

    /// The higher of the two endpoints.
    pub fn end(&self) -> u64 {
        self.a.max(self.b)
    }
}

/// One recorded entry from the configured settings allow-list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSetting {
    pub key: String,
    pub value: Value,
}

/// Persisted view state for one document identity.
///
/// A record is created lazily on the first save for an identity, mutated in
/// place on every later save, and only ever removed by LRU eviction at flush
/// time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Document size in characters at the time of the last save. Acts as a
    /// staleness guard: when the live size differs, the file changed outside
    /// this editor session and region offsets must not be reapplied.
    pub size: u64,

    /// Viewport offset per placement key. `"0"` is the canonical entry and
    /// is rewritten on every save; placement-specific entries accumulate
    /// when clone views are open.
    pub scroll: BTreeMap<String, (f64, f64)>,

    /// Selection regions, in selection order.
    pub selections: Vec<Span>,

    /// Regions of the host's mark layer.
    pub marks: Vec<Span>,

    /// Regions of the host's bookmark layer.
    pub bookmarks: Vec<Span>,

    /// Current fold regions.
    pub folds: Vec<Span>,

    /// The fold set that was overwritten by the most recent save whose
    /// outgoing folds were non-empty. Never synthesized: stays empty until
    /// a non-empty fold set is replaced.
    pub previous_folds: Vec<Span>,

    /// Recorded color scheme, when `remember_color_scheme` is enabled.
    pub color_scheme: Option<String>,

    /// Recorded syntax definition, when `remember_syntax` is enabled.
    pub syntax: Option<String>,

    /// Recorded allow-listed document settings.
    pub settings: Vec<CustomSetting>,
}

impl Record {
    /// Look up a recorded custom setting by key.
    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings
            .iter()
            .find(|item| item.key == key)
            .map(|item| &item.value)
    }
}
