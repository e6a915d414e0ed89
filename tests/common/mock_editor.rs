//! Mock host editor for integration testing.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;

use view_memory::host::WindowId;
use view_memory::{BufferId, Placement, SettingsSource, Span, View, ViewId, Workspace};

/// Fixed line height of the mock layout model.
pub const LINE_HEIGHT: f64 = 16.0;

/// Every mock document line is exactly this many characters, the last of
/// which is a newline.
pub const CHARS_PER_LINE: u64 = 100;

/// A mock view with a trivial fixed-grid layout model: line `r` spans
/// characters `[r*100, r*100+99]` and sits at layout `y = r * 16.0`.
pub struct MockView {
    id: ViewId,
    buffer: BufferId,
    path: Option<PathBuf>,
    size: Mutex<u64>,
    loading: AtomicBool,
    widget: bool,
    scratch: bool,
    placement: Mutex<Option<Placement>>,
    selections: Mutex<Vec<Span>>,
    regions: Mutex<HashMap<String, Vec<Span>>>,
    folds: Mutex<Vec<Span>>,
    viewport: Mutex<(f64, f64)>,
    extent: (f64, f64),
    settings: Mutex<HashMap<String, Value>>,
    syntax: Mutex<Option<String>>,
    color_scheme: Mutex<Option<String>>,
    /// Count of state-mutating host calls (selections, regions, folds,
    /// viewport, syntax, color scheme). Settings-cache traffic and reads
    /// are not counted.
    pub mutations: AtomicUsize,
}

impl MockView {
    pub fn new(id: u64, buffer: u64, path: Option<&str>) -> Arc<Self> {
        Arc::new(Self::new_inner(id, buffer, path))
    }

    pub fn widget(id: u64) -> Arc<Self> {
        let mut view = Self::new_inner(id, id, None);
        view.widget = true;
        Arc::new(view)
    }

    pub fn scratch(id: u64, buffer: u64) -> Arc<Self> {
        let mut view = Self::new_inner(id, buffer, Some("/tmp/scratch.txt"));
        view.scratch = true;
        Arc::new(view)
    }

    fn new_inner(id: u64, buffer: u64, path: Option<&str>) -> Self {
        Self {
            id: ViewId(id),
            buffer: BufferId(buffer),
            path: path.map(PathBuf::from),
            size: Mutex::new(1000),
            loading: AtomicBool::new(false),
            widget: false,
            scratch: false,
            placement: Mutex::new(Some(Placement::new(WindowId(1), 0, id as i32))),
            selections: Mutex::new(Vec::new()),
            regions: Mutex::new(HashMap::new()),
            folds: Mutex::new(Vec::new()),
            viewport: Mutex::new((0.0, 0.0)),
            extent: (640.0, 160.0),
            settings: Mutex::new(HashMap::new()),
            syntax: Mutex::new(None),
            color_scheme: Mutex::new(None),
            mutations: AtomicUsize::new(0),
        }
    }

    pub fn set_size(&self, size: u64) {
        *self.size.lock() = size;
    }

    pub fn set_loading(&self, loading: bool) {
        self.loading.store(loading, Ordering::SeqCst);
    }

    pub fn set_placement(&self, placement: Option<Placement>) {
        *self.placement.lock() = placement;
    }

    pub fn select(&self, spans: &[Span]) {
        *self.selections.lock() = spans.to_vec();
    }

    pub fn put_regions(&self, layer: &str, spans: &[Span]) {
        self.regions.lock().insert(layer.to_owned(), spans.to_vec());
    }

    pub fn put_folds(&self, spans: &[Span]) {
        *self.folds.lock() = spans.to_vec();
    }

    pub fn put_viewport(&self, position: (f64, f64)) {
        *self.viewport.lock() = position;
    }

    pub fn put_syntax(&self, syntax: Option<&str>) {
        *self.syntax.lock() = syntax.map(str::to_owned);
    }

    pub fn put_color_scheme(&self, scheme: Option<&str>) {
        *self.color_scheme.lock() = scheme.map(str::to_owned);
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.mutations.fetch_add(1, Ordering::SeqCst);
    }
}

impl View for MockView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn buffer_id(&self) -> BufferId {
        self.buffer
    }

    fn file_path(&self) -> Option<PathBuf> {
        self.path.clone()
    }

    fn size(&self) -> u64 {
        *self.size.lock()
    }

    fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    fn is_widget(&self) -> bool {
        self.widget
    }

    fn is_scratch(&self) -> bool {
        self.scratch
    }

    fn placement(&self) -> Option<Placement> {
        *self.placement.lock()
    }

    fn selections(&self) -> Vec<Span> {
        self.selections.lock().clone()
    }

    fn set_selections(&self, spans: &[Span]) {
        self.touch();
        *self.selections.lock() = spans.to_vec();
    }

    fn regions(&self, layer: &str) -> Vec<Span> {
        self.regions.lock().get(layer).cloned().unwrap_or_default()
    }

    fn set_regions(&self, layer: &str, spans: &[Span]) {
        self.touch();
        self.regions.lock().insert(layer.to_owned(), spans.to_vec());
    }

    fn erase_regions(&self, layer: &str) {
        self.touch();
        self.regions.lock().remove(layer);
    }

    fn folded_regions(&self) -> Vec<Span> {
        self.folds.lock().clone()
    }

    fn fold(&self, spans: &[Span]) {
        self.touch();
        self.folds.lock().extend_from_slice(spans);
    }

    fn unfold_all(&self) {
        self.touch();
        self.folds.lock().clear();
    }

    fn viewport_position(&self) -> (f64, f64) {
        *self.viewport.lock()
    }

    fn set_viewport_position(&self, position: (f64, f64), _animate: bool) {
        self.touch();
        *self.viewport.lock() = position;
    }

    fn viewport_extent(&self) -> (f64, f64) {
        self.extent
    }

    fn line_height(&self) -> f64 {
        LINE_HEIGHT
    }

    fn visible_region(&self) -> Span {
        let (_, top) = *self.viewport.lock();
        let first_row = (top / LINE_HEIGHT).floor().max(0.0) as u64;
        let rows = (self.extent.1 / LINE_HEIGHT).ceil() as u64;
        let size = *self.size.lock();
        Span::new(
            (first_row * CHARS_PER_LINE).min(size),
            ((first_row + rows) * CHARS_PER_LINE).min(size),
        )
    }

    fn line_at(&self, point: u64) -> Span {
        let row = point / CHARS_PER_LINE;
        Span::new(row * CHARS_PER_LINE, row * CHARS_PER_LINE + CHARS_PER_LINE - 1)
    }

    fn text_to_layout(&self, point: u64) -> (f64, f64) {
        let (row, col) = self.rowcol(point);
        (col as f64 * 8.0, row as f64 * LINE_HEIGHT)
    }

    fn rowcol(&self, point: u64) -> (u64, u64) {
        (point / CHARS_PER_LINE, point % CHARS_PER_LINE)
    }

    fn text_point(&self, row: u64, col: u64) -> u64 {
        row * CHARS_PER_LINE + col
    }

    fn show_at_center(&self, point: u64) {
        self.touch();
        let (row, _) = self.rowcol(point);
        let top = (row as f64 * LINE_HEIGHT - self.extent.1 / 2.0).max(0.0);
        // Deliberately trashes the horizontal offset, so callers that claim
        // to preserve it are actually observed doing so.
        *self.viewport.lock() = (42.0, top);
    }

    fn char_at(&self, point: u64) -> Option<char> {
        if point >= *self.size.lock() {
            return None;
        }
        if (point + 1) % CHARS_PER_LINE == 0 {
            Some('\n')
        } else {
            Some('x')
        }
    }

    fn setting(&self, key: &str) -> Option<Value> {
        self.settings.lock().get(key).cloned()
    }

    fn set_setting(&self, key: &str, value: Value) {
        self.settings.lock().insert(key.to_owned(), value);
    }

    fn erase_setting(&self, key: &str) {
        self.settings.lock().remove(key);
    }

    fn syntax(&self) -> Option<String> {
        self.syntax.lock().clone()
    }

    fn set_syntax(&self, syntax: &str) {
        self.touch();
        *self.syntax.lock() = Some(syntax.to_owned());
    }

    fn color_scheme(&self) -> Option<String> {
        self.color_scheme.lock().clone()
    }

    fn set_color_scheme(&self, scheme: &str) {
        self.touch();
        *self.color_scheme.lock() = Some(scheme.to_owned());
    }

    fn erase_color_scheme(&self) {
        self.touch();
        *self.color_scheme.lock() = None;
    }
}

/// Mock workspace: open views, focus, known syntaxes, and a manual queue
/// standing in for the host timer.
pub struct MockWorkspace {
    views: Mutex<Vec<Arc<MockView>>>,
    active: Mutex<Option<ViewId>>,
    syntaxes: Mutex<Vec<String>>,
    deferred: Mutex<Vec<Box<dyn FnOnce() + Send>>>,
}

impl MockWorkspace {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            views: Mutex::new(Vec::new()),
            active: Mutex::new(None),
            syntaxes: Mutex::new(Vec::new()),
            deferred: Mutex::new(Vec::new()),
        })
    }

    pub fn add_view(&self, view: &Arc<MockView>) {
        self.views.lock().push(view.clone());
    }

    pub fn set_active(&self, view: &Arc<MockView>) {
        *self.active.lock() = Some(view.id());
    }

    pub fn add_syntax(&self, name: &str) {
        self.syntaxes.lock().push(name.to_owned());
    }

    /// Number of deferred tasks waiting to run.
    pub fn deferred_len(&self) -> usize {
        self.deferred.lock().len()
    }

    /// Run every queued deferred task once. Tasks may queue new ones; those
    /// stay queued for the next call. Returns how many tasks ran.
    pub fn run_deferred(&self) -> usize {
        let tasks: Vec<_> = self.deferred.lock().drain(..).collect();
        let count = tasks.len();
        for task in tasks {
            task();
        }
        count
    }
}

impl Workspace for MockWorkspace {
    fn views(&self) -> Vec<Arc<dyn View>> {
        self.views
            .lock()
            .iter()
            .map(|view| view.clone() as Arc<dyn View>)
            .collect()
    }

    fn active_view(&self) -> Option<Arc<dyn View>> {
        let active = *self.active.lock();
        self.views
            .lock()
            .iter()
            .find(|view| Some(view.id()) == active)
            .map(|view| view.clone() as Arc<dyn View>)
    }

    fn syntax_exists(&self, syntax: &str) -> bool {
        self.syntaxes.lock().iter().any(|known| known == syntax)
    }

    fn defer(&self, _delay: Duration, task: Box<dyn FnOnce() + Send>) {
        self.deferred.lock().push(task);
    }
}

/// Mock settings source with mutable globals and per-type sections.
#[derive(Default)]
pub struct MockSettings {
    values: Mutex<HashMap<String, Value>>,
    sections: Mutex<HashMap<String, Value>>,
}

impl MockSettings {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set(&self, key: &str, value: Value) {
        self.values.lock().insert(key.to_owned(), value);
    }

    pub fn set_section(&self, name: &str, value: Value) {
        self.sections.lock().insert(name.to_owned(), value);
    }
}

impl SettingsSource for MockSettings {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.lock().get(key).cloned()
    }

    fn section(&self, name: &str) -> Option<Value> {
        self.sections.lock().get(name).cloned()
    }
}

/// Initialize test logging once.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
