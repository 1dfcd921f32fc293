//! Optimistic local effects, one per logical filesystem operation.
//!
//! [`ClientFileSystem`] translates each operation into a deterministic
//! mutation of the cached state, applied immediately, before the remote
//! call resolves. Every mutation is synchronous and total: it only touches
//! local cache state and cannot fail. The mutator never calls the remote
//! provider; the coordinator owns that sequencing and invokes these same
//! effects again as compensation when a remote call fails.

use tracing::{debug, trace};

use crate::entry::DirectoryEntry;
use crate::path::{normalize_path, parent_path};
use crate::permissions::{PermissionEntity, PermissionRole};
use crate::store::ClientFileSystemState;

/// Applies optimistic local mutations over the state store.
#[derive(Default)]
pub struct ClientFileSystem {
    store: ClientFileSystemState,
}

impl ClientFileSystem {
    /// Mutator over a fresh state store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutator over an existing state store.
    pub fn with_store(store: ClientFileSystemState) -> Self {
        Self { store }
    }

    /// The underlying state store (for subscriptions and reads).
    pub fn state(&self) -> &ClientFileSystemState {
        &self.store
    }

    /// List: mark `path` as current; the cached listing (possibly stale,
    /// possibly empty) is shown until the authoritative one arrives.
    pub fn on_list(&self, path: &str) {
        debug!(path, "on_list");
        self.store.set_path(path);
    }

    /// Store the authoritative listing for the current directory.
    ///
    /// No-op before the first navigation.
    pub fn update_current_list(&self, files: Vec<DirectoryEntry>) {
        let Some(current) = self.store.current_path() else {
            trace!("update_current_list with no current path");
            return;
        };
        self.store.set_directory_files(files, &current);
    }

    /// Create folder: synthesize a folder entry at `new_path` and insert it
    /// into the parent directory's cached listing.
    pub fn on_create_folder(&self, new_path: &str) {
        debug!(new_path, "on_create_folder");
        self.insert_entry(DirectoryEntry::new_folder(new_path));
    }

    /// Copy: insert an entry for the destination into its parent's listing.
    ///
    /// When the source directory is cached, the destination entry keeps the
    /// source's kind and metadata; otherwise a plain file entry is
    /// synthesized.
    pub fn on_copy(&self, item: &str, new_path: &str) {
        debug!(item, new_path, "on_copy");
        let entry = match self.lookup(item) {
            Some(source) => source.relocated(new_path),
            None => DirectoryEntry::new_file(new_path),
        };
        self.insert_entry(entry);
    }

    /// Move: the copy effect plus removal of the original from its parent.
    pub fn on_move(&self, item: &str, new_path: &str) {
        debug!(item, new_path, "on_move");
        self.on_copy(item, new_path);
        self.remove_entry(item);
    }

    /// Rename: a move with (typically) the same parent.
    pub fn on_rename(&self, item: &str, new_item_path: &str) {
        debug!(item, new_item_path, "on_rename");
        self.on_move(item, new_item_path);
    }

    /// Edit: no structural listing change; content is not cached.
    pub fn on_edit(&self, item: &str, _content: &str) {
        trace!(item, "on_edit");
    }

    /// Get content: purely remote, no local effect.
    pub fn on_get_content(&self, item: &str) {
        trace!(item, "on_get_content");
    }

    /// Update the entry's permissions in place; with `recursive`, apply to
    /// every cached descendant as well.
    pub fn on_set_permissions(
        &self,
        item: &str,
        role: PermissionRole,
        entity: &PermissionEntity,
        recursive: bool,
    ) {
        debug!(item, ?role, recursive, "on_set_permissions");
        let target = normalize_path(item);
        if recursive {
            let prefix = format!("{target}/");
            self.store.update_all_entries(|entry| {
                if entry.full_path == target || entry.full_path.starts_with(&prefix) {
                    entry.permissions.grant(role, entity);
                }
            });
        } else {
            self.store.update_listing(&parent_path(&target), |files| {
                for entry in files.iter_mut().filter(|e| e.full_path == target) {
                    entry.permissions.grant(role, entity);
                }
            });
        }
    }

    /// Remove: delete each entry from its parent's cached listing.
    pub fn on_remove(&self, items: &[String]) {
        debug!(?items, "on_remove");
        for item in items {
            self.remove_entry(item);
        }
    }

    /// Apply the copy effect once per item, in input order.
    pub fn on_copy_multiple(&self, items: &[String], new_directory: &str) {
        for item in items {
            self.on_copy(item, &destination_of(item, new_directory));
        }
    }

    /// Apply the move effect once per item, in input order.
    pub fn on_move_multiple(&self, items: &[String], new_directory: &str) {
        for item in items {
            self.on_move(item, &destination_of(item, new_directory));
        }
    }

    /// Apply the permission effect once per item, in input order.
    pub fn on_set_permissions_multiple(
        &self,
        items: &[String],
        role: PermissionRole,
        entity: &PermissionEntity,
        recursive: bool,
    ) {
        for item in items {
            self.on_set_permissions(item, role, entity, recursive);
        }
    }

    /// Publish a selection.
    pub fn on_select_item(&self, item: Option<DirectoryEntry>) {
        self.store.select(item);
    }

    /// Current listing, as the UI sees it.
    pub fn current_files(&self) -> Vec<DirectoryEntry> {
        self.store.current_files()
    }

    fn lookup(&self, full_path: &str) -> Option<DirectoryEntry> {
        let target = normalize_path(full_path);
        self.store
            .get_cached(&parent_path(&target))
            .into_iter()
            .find(|entry| entry.full_path == target)
    }

    fn insert_entry(&self, entry: DirectoryEntry) {
        let parent = parent_path(&entry.full_path);
        self.store.update_listing(&parent, |files| {
            // One entry per full path; replace rather than duplicate.
            files.retain(|existing| existing.full_path != entry.full_path);
            files.push(entry);
        });
    }

    fn remove_entry(&self, full_path: &str) {
        let target = normalize_path(full_path);
        self.store.update_listing(&parent_path(&target), |files| {
            files.retain(|entry| entry.full_path != target);
        });
    }
}

/// Destination path for a batch item moved or copied into `new_directory`.
fn destination_of(item: &str, new_directory: &str) -> String {
    let name = crate::path::entry_name(item);
    let dir = normalize_path(new_directory);
    if dir == "/" {
        format!("/{name}")
    } else {
        format!("{dir}/{name}")
    }
}
