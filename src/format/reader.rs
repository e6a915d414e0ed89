//! Reads the persisted store file into a [`RecordStore`].

use std::path::Path;

use crate::store::RecordStore;
use crate::types::VmemResult;

use super::compression::decompress;

/// Reader for the compressed store file.
pub struct StoreReader;

impl StoreReader {
    /// Read a store file, propagating every failure.
    pub fn read_from_file(path: &Path) -> VmemResult<RecordStore> {
        let compressed = std::fs::read(path)?;
        Self::read_from_bytes(&compressed)
    }

    /// Decode a store from compressed bytes.
    pub fn read_from_bytes(compressed: &[u8]) -> VmemResult<RecordStore> {
        let serialized = decompress(compressed)?;
        Ok(rmp_serde::from_slice(&serialized)?)
    }

    /// Read a store file, falling back to an empty store when the file is
    /// missing, unreadable, or does not decode to a record map. Startup
    /// must never fail on persisted state.
    pub fn load_or_default(path: &Path) -> RecordStore {
        match Self::read_from_file(path) {
            Ok(store) => {
                log::debug!("loaded {} records from {}", store.len(), path.display());
                store
            }
            Err(err) => {
                log::warn!(
                    "could not load store from {}, starting empty: {err}",
                    path.display()
                );
                RecordStore::new()
            }
        }
    }
}
