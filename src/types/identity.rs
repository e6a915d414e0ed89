//! Path-derived document identities.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::host::View;

/// Per-view settings key under which the computed identity is cached.
pub const IDENTITY_SETTING_KEY: &str = "view_memory_identity";

/// Stable fingerprint of a document across sessions, independent of the
/// view(s) it is open in: the first 8 hex characters of the SHA-256 digest
/// of the lexically normalized absolute file path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap an already-computed fingerprint (store round-trips, tests).
    pub fn new(fingerprint: impl Into<String>) -> Self {
        Self(fingerprint.into())
    }

    /// Compute the fingerprint for a file path.
    pub fn of_path(path: &Path) -> Self {
        let normalized = normalize_path(path);
        let digest = Sha256::digest(normalized.to_string_lossy().as_bytes());
        let mut fingerprint = String::with_capacity(8);
        for byte in &digest[..4] {
            fingerprint.push_str(&format!("{byte:02x}"));
        }
        Self(fingerprint)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of the document behind a view, cached in the view's settings
/// after the first computation.
pub fn identity_of(view: &dyn View) -> Identity {
    if let Some(Value::String(cached)) = view.setting(IDENTITY_SETTING_KEY) {
        return Identity::new(cached);
    }
    let path = view.file_path().unwrap_or_default();
    let identity = Identity::of_path(&path);
    view.set_setting(
        IDENTITY_SETTING_KEY,
        Value::String(identity.as_str().to_owned()),
    );
    identity
}

/// Lexical path normalization: collapses `.` and `..` components without
/// touching the filesystem, so identities stay stable for files that no
/// longer exist.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }
    normalized
}
