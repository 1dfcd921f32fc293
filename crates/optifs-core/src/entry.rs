//! Directory entries: the unit of every cached listing.

use serde::{Deserialize, Serialize};

use crate::path::{entry_name, normalize_path};
use crate::permissions::FilePermissions;

/// Whether an entry is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Folder,
}

/// A single file or folder inside a directory listing.
///
/// The full path is the entry's identity: entries are compared and looked up
/// by full-path equality, and a listing holds at most one entry per full
/// path. Entries are immutable once listed and replaced wholesale when the
/// directory is re-listed; the one exception is the in-place permission
/// update applied by the optimistic mutator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Full path, in navigation form (leading slash, no trailing slash).
    pub full_path: String,
    /// Display name (final path component).
    pub name: String,
    /// File or folder.
    pub kind: EntryKind,
    /// Size in bytes, when the provider reports one.
    pub size: Option<u64>,
    /// Provider-specific icon hint.
    pub icon: Option<String>,
    /// Per-entity permissions.
    pub permissions: FilePermissions,
}

impl DirectoryEntry {
    /// Create an entry of the given kind with blank metadata.
    pub fn new(full_path: &str, kind: EntryKind) -> Self {
        let full_path = normalize_path(full_path);
        let name = entry_name(&full_path);
        Self {
            full_path,
            name,
            kind,
            size: None,
            icon: None,
            permissions: FilePermissions::blank(),
        }
    }

    /// Synthesize a folder entry, as the optimistic create-folder effect does.
    pub fn new_folder(full_path: &str) -> Self {
        Self::new(full_path, EntryKind::Folder)
    }

    /// Synthesize a file entry.
    pub fn new_file(full_path: &str) -> Self {
        Self::new(full_path, EntryKind::File)
    }

    /// Whether this entry is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    /// Clone of this entry under a new full path, keeping kind and metadata.
    ///
    /// Used by the optimistic copy/move/rename effects.
    pub fn relocated(&self, new_full_path: &str) -> Self {
        let full_path = normalize_path(new_full_path);
        let name = entry_name(&full_path);
        Self {
            full_path,
            name,
            ..self.clone()
        }
    }
}
