//! Hierarchical preference resolution with per-document-type overrides.
//!
//! Every option resolves per call: the view's cached document-type tag
//! selects an override table (materialized lazily from the raw settings
//! source), and any option the table does not define falls back to the
//! global default. Globals are re-read on [`Preferences::reload`], which the
//! host calls from its settings-change notification.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::Value;

use crate::host::{SettingsSource, View};
use crate::types::DEFAULT_MAX_RECORDS;

/// Per-view settings key under which the resolved document-type tag is
/// cached.
pub const DOC_TYPE_SETTING_KEY: &str = "view_memory_doc_type";

/// Type tag for views with no syntax definition.
pub const PLAIN_TEXT_TAG: &str = "plain text";

/// Global option values with their built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefValues {
    pub remember_color_scheme: bool,
    pub remember_syntax: bool,
    pub synch_bookmarks: bool,
    pub synch_marks: bool,
    pub synch_folds: bool,
    pub synch_scroll: bool,
    pub typewriter_scrolling: bool,
    pub typewriter_scrolling_shift: i64,
    pub typewriter_scrolling_follow_cursor_movement: bool,
    pub use_animations: bool,
    pub i_use_cloned_views: bool,
    pub max_database_records: usize,
    pub restore_scroll: bool,
    pub remember_settings_list: Vec<String>,
}

impl Default for PrefValues {
    fn default() -> Self {
        Self {
            remember_color_scheme: false,
            remember_syntax: false,
            synch_bookmarks: false,
            synch_marks: false,
            synch_folds: false,
            synch_scroll: false,
            typewriter_scrolling: false,
            typewriter_scrolling_shift: 0,
            typewriter_scrolling_follow_cursor_movement: true,
            use_animations: false,
            i_use_cloned_views: false,
            max_database_records: DEFAULT_MAX_RECORDS,
            restore_scroll: true,
            remember_settings_list: Vec::new(),
        }
    }
}

/// One per-document-type override table. Absent fields fall back to the
/// global default for that option.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TypeOverrides {
    pub remember_color_scheme: Option<bool>,
    pub remember_syntax: Option<bool>,
    pub synch_bookmarks: Option<bool>,
    pub synch_marks: Option<bool>,
    pub synch_folds: Option<bool>,
    pub synch_scroll: Option<bool>,
    pub typewriter_scrolling: Option<bool>,
    pub typewriter_scrolling_shift: Option<i64>,
    pub typewriter_scrolling_follow_cursor_movement: Option<bool>,
    pub i_use_cloned_views: Option<bool>,
    pub restore_scroll: Option<bool>,
    pub remember_settings_list: Option<Vec<String>>,
}

/// The preference resolver.
pub struct Preferences {
    source: Arc<dyn SettingsSource>,
    global: RwLock<PrefValues>,
    /// Lazily materialized override tables by type tag. Only present
    /// sections are cached; a tag with no section re-probes the raw source
    /// on each call until one appears.
    overrides: RwLock<HashMap<String, TypeOverrides>>,
}

impl Preferences {
    /// Build a resolver over the raw settings source and load the globals.
    pub fn new(source: Arc<dyn SettingsSource>) -> Self {
        let prefs = Self {
            source,
            global: RwLock::new(PrefValues::default()),
            overrides: RwLock::new(HashMap::new()),
        };
        prefs.reload();
        prefs
    }

    /// Re-read all globals from the raw source and drop the materialized
    /// override tables. Called by the host when the source changes.
    pub fn reload(&self) {
        let defaults = PrefValues::default();
        let loaded = PrefValues {
            remember_color_scheme: self.bool_opt("remember_color_scheme", defaults.remember_color_scheme),
            remember_syntax: self.bool_opt("remember_syntax", defaults.remember_syntax),
            synch_bookmarks: self.bool_opt("synch_bookmarks", defaults.synch_bookmarks),
            synch_marks: self.bool_opt("synch_marks", defaults.synch_marks),
            synch_folds: self.bool_opt("synch_folds", defaults.synch_folds),
            synch_scroll: self.bool_opt("synch_scroll", defaults.synch_scroll),
            typewriter_scrolling: self.bool_opt("typewriter_scrolling", defaults.typewriter_scrolling),
            typewriter_scrolling_shift: self
                .int_opt("typewriter_scrolling_shift", defaults.typewriter_scrolling_shift),
            typewriter_scrolling_follow_cursor_movement: self.bool_opt(
                "typewriter_scrolling_follow_cursor_movement",
                defaults.typewriter_scrolling_follow_cursor_movement,
            ),
            use_animations: self.bool_opt("use_animations", defaults.use_animations),
            i_use_cloned_views: self.bool_opt("i_use_cloned_views", defaults.i_use_cloned_views),
            max_database_records: self
                .int_opt("max_database_records", defaults.max_database_records as i64)
                .max(0) as usize,
            restore_scroll: self.bool_opt("restore_scroll", defaults.restore_scroll),
            remember_settings_list: self.list_opt("remember_settings_list"),
        };
        *self.global.write() = loaded;
        self.overrides.write().clear();
    }

    fn bool_opt(&self, key: &str, default: bool) -> bool {
        match self.source.get(key) {
            Some(Value::Bool(value)) => value,
            _ => default,
        }
    }

    fn int_opt(&self, key: &str, default: i64) -> i64 {
        match self.source.get(key) {
            Some(Value::Number(value)) => value.as_i64().unwrap_or(default),
            _ => default,
        }
    }

    fn list_opt(&self, key: &str) -> Vec<String> {
        match self.source.get(key) {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(name) if !name.is_empty() => Some(name),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Document-type tag for a view: the basename of its syntax definition,
    /// extension stripped and lowercased, cached on the view after the
    /// first derivation.
    pub fn type_tag(&self, view: &dyn View) -> String {
        if let Some(Value::String(cached)) = view.setting(DOC_TYPE_SETTING_KEY) {
            return cached;
        }
        let tag = view
            .syntax()
            .map(|syntax| derive_type_tag(&syntax))
            .unwrap_or_else(|| PLAIN_TEXT_TAG.to_owned());
        view.set_setting(DOC_TYPE_SETTING_KEY, Value::String(tag.clone()));
        tag
    }

    fn overrides_for(&self, tag: &str) -> Option<TypeOverrides> {
        if let Some(cached) = self.overrides.read().get(tag) {
            return Some(cached.clone());
        }
        let materialized = self
            .source
            .section(tag)
            .and_then(|section| serde_json::from_value::<TypeOverrides>(section).ok())?;
        self.overrides
            .write()
            .insert(tag.to_owned(), materialized.clone());
        Some(materialized)
    }

    fn resolve<T>(
        &self,
        view: &dyn View,
        pick_override: impl Fn(&TypeOverrides) -> Option<T>,
        pick_global: impl Fn(&PrefValues) -> T,
    ) -> T {
        let tag = self.type_tag(view);
        if let Some(overrides) = self.overrides_for(&tag) {
            if let Some(value) = pick_override(&overrides) {
                return value;
            }
        }
        pick_global(&self.global.read())
    }

    pub fn remember_color_scheme(&self, view: &dyn View) -> bool {
        self.resolve(view, |o| o.remember_color_scheme, |g| g.remember_color_scheme)
    }

    pub fn remember_syntax(&self, view: &dyn View) -> bool {
        self.resolve(view, |o| o.remember_syntax, |g| g.remember_syntax)
    }

    pub fn synch_bookmarks(&self, view: &dyn View) -> bool {
        self.resolve(view, |o| o.synch_bookmarks, |g| g.synch_bookmarks)
    }

    pub fn synch_marks(&self, view: &dyn View) -> bool {
        self.resolve(view, |o| o.synch_marks, |g| g.synch_marks)
    }

    pub fn synch_folds(&self, view: &dyn View) -> bool {
        self.resolve(view, |o| o.synch_folds, |g| g.synch_folds)
    }

    pub fn synch_scroll(&self, view: &dyn View) -> bool {
        self.resolve(view, |o| o.synch_scroll, |g| g.synch_scroll)
    }

    pub fn typewriter_scrolling(&self, view: &dyn View) -> bool {
        self.resolve(view, |o| o.typewriter_scrolling, |g| g.typewriter_scrolling)
    }

    pub fn typewriter_scrolling_shift(&self, view: &dyn View) -> i64 {
        self.resolve(
            view,
            |o| o.typewriter_scrolling_shift,
            |g| g.typewriter_scrolling_shift,
        )
    }

    pub fn typewriter_scrolling_follow_cursor_movement(&self, view: &dyn View) -> bool {
        self.resolve(
            view,
            |o| o.typewriter_scrolling_follow_cursor_movement,
            |g| g.typewriter_scrolling_follow_cursor_movement,
        )
    }

    pub fn i_use_cloned_views(&self, view: &dyn View) -> bool {
        self.resolve(view, |o| o.i_use_cloned_views, |g| g.i_use_cloned_views)
    }

    pub fn restore_scroll(&self, view: &dyn View) -> bool {
        self.resolve(view, |o| o.restore_scroll, |g| g.restore_scroll)
    }

    pub fn remember_settings_list(&self, view: &dyn View) -> Vec<String> {
        self.resolve(
            view,
            |o| o.remember_settings_list.clone(),
            |g| g.remember_settings_list.clone(),
        )
    }

    /// Whether viewport moves are animated. Global only.
    pub fn use_animations(&self) -> bool {
        self.global.read().use_animations
    }

    /// Store record cap. Global only.
    pub fn max_database_records(&self) -> usize {
        self.global.read().max_database_records
    }
}

/// `"Packages/Rust/Rust.sublime-syntax"` → `"rust"`.
fn derive_type_tag(syntax: &str) -> String {
    let basename = syntax.rsplit(['/', '\\']).next().unwrap_or(syntax);
    let stem = basename.split('.').next().unwrap_or(basename);
    stem.to_lowercase()
}
