//! Error types for the ViewMemory library.

use thiserror::Error;

/// All errors that can occur in the ViewMemory library.
///
/// None of these cross the host boundary: every caller either recovers
/// (missing or corrupt store files fall back to an empty store) or swallows
/// the failure and lets the next flush supersede it.
#[derive(Error, Debug)]
pub enum VmemError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Store serialization error.
    #[error("Store encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Store deserialization error, including structurally wrong content.
    #[error("Store decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

/// Convenience result type for ViewMemory operations.
pub type VmemResult<T> = Result<T, VmemError>;
