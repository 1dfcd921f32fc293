//! Client-side core of the optifs file manager: the local, optimistic view
//! of a remote filesystem.
//!
//! # Components
//!
//! - [`cache::DirectoryCache`]: bounded per-directory listing cache with a
//!   pluggable [`cache::EvictionStrategy`] (random eviction by default).
//! - [`store::ClientFileSystemState`]: reactive holders for the current
//!   path, current listing, and selected entry (hot, replay-1 channels).
//! - [`mutator::ClientFileSystem`]: the deterministic local effect of each
//!   logical filesystem operation, applied before the remote call resolves.
//!
//! The optimistic coordinator that sequences these local effects with the
//! authoritative remote calls lives in the `optifs-client` crate.
//!
//! # Consistency contract
//!
//! Everything here is process-local and non-persisted. The remote provider
//! is the source of truth; this crate only guarantees that the local view
//! converges to it on the next full listing, and that failed remote
//! operations are compensated where a compensation is defined.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod entry;
pub mod mutator;
pub mod path;
pub mod permissions;
pub mod stats;
pub mod store;

pub use cache::{DirectoryCache, EvictionStrategy, RandomEviction, DEFAULT_CACHE_CAPACITY};
pub use entry::{DirectoryEntry, EntryKind};
pub use mutator::ClientFileSystem;
pub use permissions::{
    FilePermissions, OthersAccess, PermissionEntity, PermissionRole, UserCustomClaims,
};
pub use stats::{CacheStats, CacheStatsSnapshot};
pub use store::{ClientFileSystemState, DirectoryView};
