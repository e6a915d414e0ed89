//! Cross-session behavior: flush on shutdown, restore in a fresh process.

mod common;

use std::sync::Arc;

use common::mock_editor::{init_logger, MockSettings, MockView, MockWorkspace};
use tempfile::TempDir;

use view_memory::{
    RestoreOutcome, SaveTrigger, Span, StoreConfig, StoreReader, View, ViewMemory, Workspace,
};

fn engine_at(dir: &TempDir, workspace: &Arc<MockWorkspace>) -> Arc<ViewMemory> {
    ViewMemory::new(
        workspace.clone() as Arc<dyn Workspace>,
        MockSettings::new(),
        StoreConfig {
            store_path: dir.path().join("records.bin.gz"),
        },
    )
}

#[test]
fn test_shutdown_flushes_pending_state() {
    init_logger();
    let dir = TempDir::new().unwrap();
    let workspace = MockWorkspace::new();
    let engine = engine_at(&dir, &workspace);
    engine.start();

    let view = MockView::new(1, 1, Some("/home/user/notes.txt"));
    view.select(&[Span::new(5, 5)]);
    workspace.add_view(&view);
    engine.save(&(view.clone() as Arc<dyn View>), SaveTrigger::PreSave);

    engine.shutdown();

    let persisted = StoreReader::read_from_file(&dir.path().join("records.bin.gz")).unwrap();
    assert_eq!(persisted.len(), 1);
}

#[test]
fn test_state_survives_into_next_session() {
    init_logger();
    let dir = TempDir::new().unwrap();

    // First session: work in a view, then shut down.
    {
        let workspace = MockWorkspace::new();
        let engine = engine_at(&dir, &workspace);
        let view = MockView::new(1, 1, Some("/home/user/main.rs"));
        view.put_viewport((3.0, 640.0));
        view.select(&[Span::new(5, 9)]);
        view.put_folds(&[Span::new(10, 20)]);
        workspace.add_view(&view);
        engine.save(&(view.clone() as Arc<dyn View>), SaveTrigger::Deactivated);
        engine.shutdown();
    }

    // Second session: a fresh engine over the same store file restores the
    // same document into a brand-new view.
    let workspace = MockWorkspace::new();
    let engine = engine_at(&dir, &workspace);
    let view = MockView::new(42, 1, Some("/home/user/main.rs"));
    workspace.add_view(&view);

    assert_eq!(
        engine.restore(&(view.clone() as Arc<dyn View>)),
        RestoreOutcome::Applied
    );
    assert_eq!(view.viewport_position(), (3.0, 640.0));
    assert_eq!(view.selections(), vec![Span::new(5, 9)]);
    assert_eq!(view.folded_regions(), vec![Span::new(10, 20)]);
}
