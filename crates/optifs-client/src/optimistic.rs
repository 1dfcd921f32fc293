//! The optimistic coordinator: local-then-remote sequencing with rollback.
//!
//! Every public operation follows the same protocol:
//!
//! 1. apply the operation's local effect (synchronous, cannot fail),
//! 2. await the corresponding remote provider call,
//! 3. on success, commit — the local view already reflects the change,
//! 4. on failure, apply the operation's compensating local mutation (where
//!    one is defined) and surface the error.
//!
//! Each invocation moves through `LocalApplied → RemotePending` and settles
//! in [`OpOutcome::Committed`] or [`OpOutcome::RolledBack`].
//!
//! Compensation coverage is deliberately partial, matching the system this
//! was built for: create/copy remove the synthesized destination entry,
//! rename renames back, and move removes the destination *without* restoring
//! the source. Remove, edit, permission changes and all batch operations
//! surface the error with no compensation; the local view stays ahead of the
//! remote system until the next full listing.
//!
//! Operations targeting the same path are not serialized against each other:
//! when two remote calls on one directory overlap, the final cache state is
//! decided by whichever resolves last. Callers needing stricter ordering
//! must sequence their own calls.

use std::sync::Arc;

use tracing::{debug, error};

use optifs_core::path::parent_path;
use optifs_core::{ClientFileSystem, DirectoryEntry, PermissionEntity, PermissionRole};

use crate::notify::Notifier;
use crate::provider::{FileSystemProvider, ProviderError, ProviderResult};
use crate::telemetry::ClientTelemetry;

/// Terminal state of one coordinator invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpOutcome {
    /// The remote call succeeded; the optimistic local state stands.
    Committed,
    /// The remote call failed; compensation (where defined) was applied and
    /// the error was surfaced.
    RolledBack,
}

/// Coordinates optimistic local mutations with authoritative remote calls.
pub struct OptimisticFileSystem<P> {
    remote: P,
    local: ClientFileSystem,
    notifier: Arc<dyn Notifier>,
    telemetry: Arc<ClientTelemetry>,
}

impl<P> Drop for OptimisticFileSystem<P> {
    fn drop(&mut self) {
        self.telemetry.instance_dropped();
    }
}

impl<P: FileSystemProvider> OptimisticFileSystem<P> {
    /// Wire a coordinator from its collaborators.
    ///
    /// Telemetry is shared by reference so a host can watch the instance
    /// gauge across every coordinator it creates.
    pub fn new(
        remote: P,
        local: ClientFileSystem,
        notifier: Arc<dyn Notifier>,
        telemetry: Arc<ClientTelemetry>,
    ) -> Self {
        telemetry.instance_created();
        Self {
            remote,
            local,
            notifier,
            telemetry,
        }
    }

    /// The local mutator and state store behind this coordinator.
    pub fn local(&self) -> &ClientFileSystem {
        &self.local
    }

    /// Shared telemetry counters.
    pub fn telemetry(&self) -> &Arc<ClientTelemetry> {
        &self.telemetry
    }

    /// Navigate to a directory.
    ///
    /// The cached listing is shown immediately; on success the authoritative
    /// listing replaces it and the first entry (in listing order) is
    /// selected. On failure nothing is rolled back, since there is nothing
    /// optimistic to undo, and the error is absorbed after reporting.
    pub async fn handle_list(&self, directory_path: &str) -> OpOutcome {
        debug!(directory_path, "handle_list");
        self.local.on_list(directory_path);
        match self.remote.list(directory_path).await {
            Ok(files) => {
                self.local.update_current_list(files);
                self.select_first_in_current_directory();
                self.commit()
            }
            Err(err) => {
                self.report_error(&err, "Cannot get directory list", "List Error");
                self.roll_back()
            }
        }
    }

    /// Create a folder. Compensation: remove the synthesized entry.
    pub async fn handle_create_folder(&self, new_path: &str) -> OpOutcome {
        debug!(new_path, "handle_create_folder");
        self.local.on_create_folder(new_path);
        match self.remote.create_folder(new_path).await {
            Ok(()) => self.commit(),
            Err(err) => {
                self.report_error(&err, "Cannot create folder", "Create Folder Error");
                self.remove_local(new_path);
                self.roll_back()
            }
        }
    }

    /// Copy one item. Compensation: remove the synthesized destination entry.
    pub async fn handle_copy(&self, item: &str, new_path: &str) -> OpOutcome {
        debug!(item, new_path, "handle_copy");
        self.local.on_copy(item, new_path);
        match self.remote.copy(item, new_path).await {
            Ok(()) => self.commit(),
            Err(err) => {
                self.report_error(&err, "Cannot copy item", "Copy Error");
                self.remove_local(new_path);
                self.roll_back()
            }
        }
    }

    /// Move one item.
    ///
    /// Compensation removes the destination entry only; the source entry is
    /// not restored and reappears on the next full listing of its parent.
    pub async fn handle_move(&self, item: &str, new_path: &str) -> OpOutcome {
        debug!(item, new_path, "handle_move");
        self.local.on_move(item, new_path);
        match self.remote.move_item(item, new_path).await {
            Ok(()) => self.commit(),
            Err(err) => {
                self.report_error(&err, "Cannot move item", "Move Error");
                self.remove_local(new_path);
                self.roll_back()
            }
        }
    }

    /// Rename one item. Compensation: rename back to the old path.
    pub async fn handle_rename(&self, item: &str, new_item_path: &str) -> OpOutcome {
        debug!(item, new_item_path, "handle_rename");
        self.local.on_rename(item, new_item_path);
        match self.remote.rename(item, new_item_path).await {
            Ok(()) => self.commit(),
            Err(err) => {
                self.report_error(&err, "Cannot rename item", "Rename Error");
                self.local.on_rename(new_item_path, item);
                self.roll_back()
            }
        }
    }

    /// Edit a file's content. No local structural effect, no compensation.
    pub async fn handle_edit(&self, item: &str, content: &str) -> OpOutcome {
        debug!(item, "handle_edit");
        self.local.on_edit(item, content);
        match self.remote.edit(item, content).await {
            Ok(()) => self.commit(),
            Err(err) => {
                self.report_error(&err, "Cannot edit item", "Edit Error");
                self.roll_back()
            }
        }
    }

    /// Fetch a file's content. Returns `None` after a reported failure.
    pub async fn handle_get_content(&self, item: &str) -> Option<String> {
        debug!(item, "handle_get_content");
        self.local.on_get_content(item);
        match self.remote.get_content(item).await {
            Ok(content) => Some(content),
            Err(err) => {
                self.report_error(&err, "Cannot get item", "Get Content Error");
                None
            }
        }
    }

    /// Apply a permission grant. No compensation on failure.
    pub async fn handle_set_permissions(
        &self,
        item: &str,
        role: PermissionRole,
        entity: &PermissionEntity,
        recursive: bool,
    ) -> OpOutcome {
        debug!(item, ?role, recursive, "handle_set_permissions");
        self.local.on_set_permissions(item, role, entity, recursive);
        match self
            .remote
            .set_permissions(item, role, entity, recursive)
            .await
        {
            Ok(()) => self.commit(),
            Err(err) => {
                self.report_error(&err, "Cannot set permissions to item", "Permissions Error");
                self.roll_back()
            }
        }
    }

    /// Remove items. No compensation on failure.
    pub async fn handle_remove(&self, items: &[String]) -> OpOutcome {
        debug!(?items, "handle_remove");
        self.local.on_remove(items);
        match self.remote.remove(items).await {
            Ok(()) => self.commit(),
            Err(err) => {
                self.report_error(&err, "Cannot remove items", "Remove Error");
                self.roll_back()
            }
        }
    }

    /// Copy items into a directory. No compensation on failure.
    pub async fn handle_copy_multiple(&self, items: &[String], new_directory: &str) -> OpOutcome {
        debug!(?items, new_directory, "handle_copy_multiple");
        self.local.on_copy_multiple(items, new_directory);
        match self.remote.copy_multiple(items, new_directory).await {
            Ok(()) => self.commit(),
            Err(err) => {
                self.report_error(&err, "Cannot copy items", "Copy Error");
                self.roll_back()
            }
        }
    }

    /// Move items into a directory. No compensation on failure.
    pub async fn handle_move_multiple(&self, items: &[String], new_directory: &str) -> OpOutcome {
        debug!(?items, new_directory, "handle_move_multiple");
        self.local.on_move_multiple(items, new_directory);
        match self.remote.move_multiple(items, new_directory).await {
            Ok(()) => self.commit(),
            Err(err) => {
                self.report_error(&err, "Cannot move items", "Move Error");
                self.roll_back()
            }
        }
    }

    /// Apply a permission grant to several items. No compensation on failure.
    pub async fn handle_set_permissions_multiple(
        &self,
        items: &[String],
        role: PermissionRole,
        entity: &PermissionEntity,
        recursive: bool,
    ) -> OpOutcome {
        debug!(?items, ?role, recursive, "handle_set_permissions_multiple");
        self.local
            .on_set_permissions_multiple(items, role, entity, recursive);
        match self
            .remote
            .set_permissions_multiple(items, role, entity, recursive)
            .await
        {
            Ok(()) => self.commit(),
            Err(err) => {
                self.report_error(&err, "Cannot set permissions to items", "Permissions Error");
                self.roll_back()
            }
        }
    }

    /// Navigate to the parent of the current path.
    ///
    /// Unlike every other handler this re-raises after reporting, so the
    /// caller can react to a navigation that could not even start.
    pub async fn handle_navigate_up(&self) -> ProviderResult<OpOutcome> {
        debug!("handle_navigate_up");
        let Some(current) = self.local.state().current_path() else {
            let err = ProviderError::Remote("no current directory".to_string());
            self.report_error(&err, "Cannot navigate to parent directory", "Navigate Error");
            return Err(err);
        };
        let parent = parent_path(&current);
        Ok(self.handle_list(&parent).await)
    }

    /// Entry in the current listing with the given full path, if any.
    pub fn get_item_by_name(&self, full_path: &str) -> Option<DirectoryEntry> {
        self.local
            .current_files()
            .into_iter()
            .find(|entry| entry.full_path == full_path)
    }

    /// Publish a selection.
    pub fn on_select_item(&self, item: Option<DirectoryEntry>) {
        self.local.on_select_item(item);
    }

    /// Select the current-listing entry with the given full path (clearing
    /// the selection when there is no match).
    pub fn on_select_item_by_name(&self, full_path: &str) {
        let item = self.get_item_by_name(full_path);
        self.local.on_select_item(item);
    }

    fn select_first_in_current_directory(&self) {
        let first = self.local.current_files().into_iter().next();
        self.local.on_select_item(first);
    }

    fn remove_local(&self, path: &str) {
        self.local.on_remove(&[path.to_string()]);
    }

    fn commit(&self) -> OpOutcome {
        self.telemetry.record_committed();
        OpOutcome::Committed
    }

    fn roll_back(&self) -> OpOutcome {
        self.telemetry.record_rolled_back();
        OpOutcome::RolledBack
    }

    /// Single policy point for error surfacing: API-classified failures are
    /// logged and counted but not notified (the provider already surfaced
    /// them); everything else goes to the notifier as a title/message pair.
    fn report_error(&self, err: &ProviderError, title: &str, message: &str) {
        error!(%err, title, message, api = err.is_api(), "remote operation failed");
        if err.is_api() {
            self.telemetry.record_error_suppressed();
            return;
        }
        self.notifier.notify(title, message);
    }
}
