//! The remote filesystem provider capability.
//!
//! [`FileSystemProvider`] is the authoritative side of the synchronization
//! layer: a network API wrapping a cloud object store, out of scope here
//! beyond this trait. Every call is asynchronous and returns a
//! [`ProviderError`] on failure, with the classification already attached as
//! a structured kind; the coordinator never inspects error message text.

use async_trait::async_trait;
use thiserror::Error;

use optifs_core::{DirectoryEntry, PermissionEntity, PermissionRole};

/// Failure of a remote provider call.
///
/// [`ProviderError::Api`] marks failures the provider has already surfaced
/// through its own channel; the coordinator logs those but does not notify
/// the user again. Every other kind is surfaced through the notification
/// capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// An API-level error, already reported upstream by the provider.
    #[error("API error: {0}")]
    Api(String),
    /// The target path does not exist remotely.
    #[error("not found: {0}")]
    NotFound(String),
    /// The authenticated principal lacks permission for the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// Any other remote failure (transport, timeout, server error).
    #[error("remote error: {0}")]
    Remote(String),
}

impl ProviderError {
    /// Whether this failure is API-classified and should be suppressed from
    /// user-facing notification.
    pub fn is_api(&self) -> bool {
        matches!(self, ProviderError::Api(_))
    }
}

/// Result alias for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Asynchronous, authoritative filesystem operations.
///
/// Implementations perform the real remote work; the coordinator pairs each
/// call with an optimistic local effect and a compensation.
#[async_trait]
pub trait FileSystemProvider: Send + Sync {
    /// List the entries of a directory.
    async fn list(&self, path: &str) -> ProviderResult<Vec<DirectoryEntry>>;

    /// Create a folder at the given path.
    async fn create_folder(&self, path: &str) -> ProviderResult<()>;

    /// Copy one item to a new full path.
    async fn copy(&self, src: &str, dst: &str) -> ProviderResult<()>;

    /// Move one item to a new full path.
    async fn move_item(&self, src: &str, dst: &str) -> ProviderResult<()>;

    /// Rename one item (a move within the same parent).
    async fn rename(&self, src: &str, dst: &str) -> ProviderResult<()>;

    /// Replace a file's content.
    async fn edit(&self, path: &str, content: &str) -> ProviderResult<()>;

    /// Fetch a file's content.
    async fn get_content(&self, path: &str) -> ProviderResult<String>;

    /// Remove each of the given items.
    async fn remove(&self, paths: &[String]) -> ProviderResult<()>;

    /// Apply a permission grant to one item, optionally recursively.
    async fn set_permissions(
        &self,
        path: &str,
        role: PermissionRole,
        entity: &PermissionEntity,
        recursive: bool,
    ) -> ProviderResult<()>;

    /// Copy several items into a destination directory.
    async fn copy_multiple(&self, paths: &[String], new_directory: &str) -> ProviderResult<()>;

    /// Move several items into a destination directory.
    async fn move_multiple(&self, paths: &[String], new_directory: &str) -> ProviderResult<()>;

    /// Apply a permission grant to several items.
    async fn set_permissions_multiple(
        &self,
        paths: &[String],
        role: PermissionRole,
        entity: &PermissionEntity,
        recursive: bool,
    ) -> ProviderResult<()>;
}
