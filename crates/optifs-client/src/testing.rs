//! Test doubles for the provider and notification boundaries.
//!
//! Hosts embedding the coordinator (and this crate's own tests) need a
//! provider that answers from memory and fails on command, plus a notifier
//! that records what the user would have seen. Both live here so integration
//! tests across crates can share them.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use async_trait::async_trait;
use optifs_core::{DirectoryEntry, PermissionEntity, PermissionRole};

use crate::notify::Notifier;
use crate::provider::{FileSystemProvider, ProviderError, ProviderResult};

/// In-memory [`FileSystemProvider`] with per-operation failure injection.
///
/// Listings are plain stored values; mutating operations succeed without
/// touching them unless a listing update matters to the test. Failures are
/// armed by operation name and consumed in order, one per call.
///
/// Clones share state, so a test can hand one clone to the coordinator and
/// keep another to arm failures or inspect the recorded calls.
#[derive(Clone, Default)]
pub struct InMemoryProvider {
    listings: Arc<Mutex<HashMap<String, Vec<DirectoryEntry>>>>,
    failures: Arc<Mutex<HashMap<&'static str, Vec<ProviderError>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl InMemoryProvider {
    /// Empty provider that succeeds on every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load the listing returned by `list` for a directory path.
    pub fn stock_listing(&self, path: &str, files: Vec<DirectoryEntry>) {
        self.listings.lock().insert(path.to_string(), files);
    }

    /// Arm the next call of `operation` (e.g. `"create_folder"`) to fail.
    pub fn fail_next(&self, operation: &'static str, error: ProviderError) {
        self.failures.lock().entry(operation).or_default().push(error);
    }

    /// Operation names in invocation order, for asserting call sequences.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn check(&self, operation: &'static str) -> ProviderResult<()> {
        self.calls.lock().push(operation.to_string());
        let mut failures = self.failures.lock();
        if let Some(queue) = failures.get_mut(operation) {
            if !queue.is_empty() {
                return Err(queue.remove(0));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl FileSystemProvider for InMemoryProvider {
    async fn list(&self, path: &str) -> ProviderResult<Vec<DirectoryEntry>> {
        self.check("list")?;
        Ok(self.listings.lock().get(path).cloned().unwrap_or_default())
    }

    async fn create_folder(&self, _path: &str) -> ProviderResult<()> {
        self.check("create_folder")
    }

    async fn copy(&self, _src: &str, _dst: &str) -> ProviderResult<()> {
        self.check("copy")
    }

    async fn move_item(&self, _src: &str, _dst: &str) -> ProviderResult<()> {
        self.check("move_item")
    }

    async fn rename(&self, _src: &str, _dst: &str) -> ProviderResult<()> {
        self.check("rename")
    }

    async fn edit(&self, _path: &str, _content: &str) -> ProviderResult<()> {
        self.check("edit")
    }

    async fn get_content(&self, path: &str) -> ProviderResult<String> {
        self.check("get_content")?;
        Ok(format!("content of {path}"))
    }

    async fn remove(&self, _paths: &[String]) -> ProviderResult<()> {
        self.check("remove")
    }

    async fn set_permissions(
        &self,
        _path: &str,
        _role: PermissionRole,
        _entity: &PermissionEntity,
        _recursive: bool,
    ) -> ProviderResult<()> {
        self.check("set_permissions")
    }

    async fn copy_multiple(&self, _paths: &[String], _new_directory: &str) -> ProviderResult<()> {
        self.check("copy_multiple")
    }

    async fn move_multiple(&self, _paths: &[String], _new_directory: &str) -> ProviderResult<()> {
        self.check("move_multiple")
    }

    async fn set_permissions_multiple(
        &self,
        _paths: &[String],
        _role: PermissionRole,
        _entity: &PermissionEntity,
        _recursive: bool,
    ) -> ProviderResult<()> {
        self.check("set_permissions_multiple")
    }
}

/// [`Notifier`] that records every title/message pair it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications so far, in order.
    pub fn notifications(&self) -> Vec<(String, String)> {
        self.notifications.lock().clone()
    }

    /// Number of notifications so far.
    pub fn count(&self) -> usize {
        self.notifications.lock().len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) {
        self.notifications
            .lock()
            .push((title.to_string(), message.to_string()));
    }
}
