//! The background loop threads.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::engine::ViewMemory;

/// Cadence of the scroll-sync loop.
pub const SCROLL_SYNC_CADENCE: Duration = Duration::from_millis(80);

/// Cadence of the data-sync loop.
pub const DATA_SYNC_CADENCE: Duration = Duration::from_millis(500);

/// Spawn both sync loops. Each tick body is single-flight internally, so a
/// slow tick overlapping the next timer fire is dropped, not queued.
pub(crate) fn spawn_loops(engine: &Arc<ViewMemory>) -> Vec<JoinHandle<()>> {
    let scroll = {
        let engine = engine.clone();
        std::thread::spawn(move || {
            while !engine.state.shutdown.load(Ordering::SeqCst) {
                engine.sync_scroll();
                std::thread::sleep(SCROLL_SYNC_CADENCE);
            }
        })
    };
    let data = {
        let engine = engine.clone();
        std::thread::spawn(move || {
            while !engine.state.shutdown.load(Ordering::SeqCst) {
                engine.sync_data(None);
                std::thread::sleep(DATA_SYNC_CADENCE);
            }
        })
    };
    vec![scroll, data]
}
