//! Reactive client filesystem state, backed by the directory cache.
//!
//! [`ClientFileSystemState`] owns the [`DirectoryCache`] and publishes three
//! observable values through hot, replay-1 channels (`tokio::sync::watch`):
//! the current path, the current listing, and the selected entry. The path
//! and listing travel together in a single [`DirectoryView`] value, so a
//! subscriber can never observe a path update without the matching listing.
//!
//! The cache sits behind one `parking_lot` mutex, and no lock is ever held
//! across an await point; on a multi-threaded runtime this preserves the
//! single-writer invariant the synchronization layer depends on.

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

use crate::cache::DirectoryCache;
use crate::entry::DirectoryEntry;
use crate::path::{dir_key, ensure_leading_slash};

/// The atomically published pair of current path and current listing.
///
/// Invariant: `files` always equals the cache contents for `path` at the
/// time of publication.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryView {
    /// Current path in navigation form; `None` before the first navigation.
    pub path: Option<String>,
    /// Listing for `path` (possibly empty on a cache miss).
    pub files: Vec<DirectoryEntry>,
}

/// Reactive holder for the client's view of the filesystem.
pub struct ClientFileSystemState {
    cache: Mutex<DirectoryCache>,
    view: watch::Sender<DirectoryView>,
    selection: watch::Sender<Option<DirectoryEntry>>,
}

impl Default for ClientFileSystemState {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientFileSystemState {
    /// State store over a default-capacity cache.
    pub fn new() -> Self {
        Self::with_cache(DirectoryCache::new())
    }

    /// State store over a custom cache.
    pub fn with_cache(cache: DirectoryCache) -> Self {
        let (view, _) = watch::channel(DirectoryView::default());
        let (selection, _) = watch::channel(None);
        Self {
            cache: Mutex::new(cache),
            view,
            selection,
        }
    }

    /// Subscribe to the current path + listing pair.
    ///
    /// The receiver immediately replays the latest value and is notified on
    /// every subsequent publication.
    pub fn subscribe_view(&self) -> watch::Receiver<DirectoryView> {
        self.view.subscribe()
    }

    /// Subscribe to the selected entry.
    pub fn subscribe_selection(&self) -> watch::Receiver<Option<DirectoryEntry>> {
        self.selection.subscribe()
    }

    /// Current path, if any navigation has happened.
    pub fn current_path(&self) -> Option<String> {
        self.view.borrow().path.clone()
    }

    /// Current listing (empty before the first navigation).
    pub fn current_files(&self) -> Vec<DirectoryEntry> {
        self.view.borrow().files.clone()
    }

    /// Currently selected entry.
    pub fn selected(&self) -> Option<DirectoryEntry> {
        self.selection.borrow().clone()
    }

    /// Navigate to `path`: normalize it, read the cache, and publish the new
    /// path together with its (possibly empty) listing in one step.
    pub fn set_path(&self, path: &str) {
        let parsed = ensure_leading_slash(path);
        let mut cache = self.cache.lock();
        let files = cache.get(&parsed);
        debug!(path, %parsed, files = files.len(), "set_path");
        self.view.send_replace(DirectoryView {
            path: Some(parsed),
            files,
        });
    }

    /// Store the authoritative listing for a directory, republishing the view
    /// when that directory is the current one.
    pub fn set_directory_files(&self, files: Vec<DirectoryEntry>, directory_path: &str) {
        let mut cache = self.cache.lock();
        cache.set(directory_path, files);
        self.republish_if_current(&mut cache, directory_path);
    }

    /// Apply a targeted mutation to one directory's cached listing,
    /// republishing the view when that directory is the current one.
    pub fn update_listing(&self, directory_path: &str, f: impl FnOnce(&mut Vec<DirectoryEntry>)) {
        let mut cache = self.cache.lock();
        cache.update(directory_path, f);
        self.republish_if_current(&mut cache, directory_path);
    }

    /// Apply a mutation to every cached entry, then republish the current view.
    pub fn update_all_entries(&self, f: impl FnMut(&mut DirectoryEntry)) {
        let mut cache = self.cache.lock();
        cache.for_each_entry_mut(f);
        if let Some(current) = self.view.borrow().path.clone() {
            let files = cache.get(&current);
            self.view.send_replace(DirectoryView {
                path: Some(current),
                files,
            });
        }
    }

    /// Publish a selection; independent of listing changes.
    pub fn select(&self, entry: Option<DirectoryEntry>) {
        self.selection.send_replace(entry);
    }

    /// Cached listing for `path` without changing the current view.
    pub fn get_cached(&self, path: &str) -> Vec<DirectoryEntry> {
        self.cache.lock().get(path)
    }

    /// Whether `full_path` is present in the cached listing of `cwd`.
    pub fn exists(&self, full_path: &str, cwd: &str) -> bool {
        self.cache.lock().exists(full_path, cwd)
    }

    fn republish_if_current(&self, cache: &mut DirectoryCache, directory_path: &str) {
        let current = self.view.borrow().path.clone();
        let Some(current) = current else { return };
        if dir_key(&current) == dir_key(directory_path) {
            let files = cache.get(&current);
            self.view.send_replace(DirectoryView {
                path: Some(current),
                files,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> DirectoryEntry {
        DirectoryEntry::new_file(path)
    }

    #[test]
    fn path_normalization_is_observable() {
        let store = ClientFileSystemState::new();
        store.set_path("a");
        let relative = store.current_path();
        store.set_path("/a");
        assert_eq!(relative, store.current_path());
        assert_eq!(store.current_path().as_deref(), Some("/a"));
    }

    #[test]
    fn set_path_publishes_path_and_listing_together() {
        let store = ClientFileSystemState::new();
        store.set_directory_files(vec![file("/docs/a.txt")], "/docs/");
        store.set_directory_files(vec![file("/other/b.txt")], "/other/");

        store.set_path("/docs");
        let rx = store.subscribe_view();
        let view = rx.borrow();
        assert_eq!(view.path.as_deref(), Some("/docs"));
        assert_eq!(view.files, vec![file("/docs/a.txt")]);
    }

    #[test]
    fn view_starts_empty() {
        let store = ClientFileSystemState::new();
        let rx = store.subscribe_view();
        assert_eq!(rx.borrow().path, None);
        assert!(rx.borrow().files.is_empty());
    }

    #[tokio::test]
    async fn subscribers_are_notified_of_changes() {
        let store = ClientFileSystemState::new();
        let mut rx = store.subscribe_view();

        store.set_path("/docs");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().path.as_deref(), Some("/docs"));

        store.set_directory_files(vec![file("/docs/a.txt")], "/docs/");
        rx.changed().await.unwrap();
        let view = rx.borrow_and_update().clone();
        assert_eq!(view.path.as_deref(), Some("/docs"));
        assert_eq!(view.files.len(), 1);
    }

    #[test]
    fn writing_a_non_current_directory_keeps_the_view() {
        let store = ClientFileSystemState::new();
        store.set_path("/docs");
        store.set_directory_files(vec![file("/other/b.txt")], "/other/");

        let view = store.subscribe_view().borrow().clone();
        assert_eq!(view.path.as_deref(), Some("/docs"));
        assert!(view.files.is_empty());
    }

    #[test]
    fn selection_is_independent_of_listing() {
        let store = ClientFileSystemState::new();
        let entry = file("/docs/a.txt");
        store.select(Some(entry.clone()));
        assert_eq!(store.selected(), Some(entry));

        store.set_path("/elsewhere");
        assert!(store.selected().is_some());
    }

    #[test]
    fn exists_reads_through_cache() {
        let store = ClientFileSystemState::new();
        store.set_directory_files(vec![file("/docs/a.txt")], "/docs/");
        assert!(store.exists("/docs/a.txt", "/docs/"));
        assert!(!store.exists("/docs/missing.txt", "/docs/"));
    }
}
