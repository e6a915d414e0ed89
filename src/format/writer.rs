//! Writes the store to its durable location.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::store::RecordStore;
use crate::types::VmemResult;

use super::compression::compress;

/// Writer for the compressed store file.
pub struct StoreWriter;

impl StoreWriter {
    /// Encode a store to compressed bytes.
    pub fn write_to_bytes(store: &RecordStore) -> VmemResult<Vec<u8>> {
        let serialized = rmp_serde::to_vec(store)?;
        compress(&serialized)
    }

    /// Write a store to `path` via a temporary sibling file, then replace
    /// the previous file with a best-effort remove + rename. Neither replace
    /// step is allowed to fail the flush: a partial replace is superseded by
    /// the next successful one.
    pub fn write_to_file(store: &RecordStore, path: &Path) -> VmemResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = temp_path(path);
        std::fs::write(&tmp, Self::write_to_bytes(store)?)?;

        if let Err(err) = std::fs::remove_file(path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                log::debug!("could not remove previous store file: {err}");
            }
        }
        if let Err(err) = std::fs::rename(&tmp, path) {
            log::warn!("could not move store file into place: {err}");
        }
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
