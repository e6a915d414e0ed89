//! Best-effort multi-view synchronization.
//!
//! Two free-running loops poll the focused view: one propagates vertical
//! scroll offsets across clone views, one mirrors bookmarks/marks/folds.
//! Both are eventually consistent and never touch the interactive path.

pub mod data;
pub mod loops;
pub mod scroll;

pub use loops::{DATA_SYNC_CADENCE, SCROLL_SYNC_CADENCE};
pub(crate) use loops::spawn_loops;

use std::sync::atomic::{AtomicBool, Ordering};

/// Single-flight guard over an [`AtomicBool`]: a tick that finds the flag
/// already set exits immediately instead of queuing, and the flag is
/// released on drop so early returns cannot leak it.
pub(crate) struct FlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlagGuard<'a> {
    pub(crate) fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self { flag })
        }
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
