//! Optimistic coordinator and remote provider boundary for the optifs file
//! manager core.
//!
//! This crate owns the client/server seam: the [`FileSystemProvider`]
//! capability (the authoritative, asynchronous side), the [`Notifier`]
//! capability (how failures reach the user), and the
//! [`OptimisticFileSystem`] coordinator that sequences every operation as
//! {optimistic local mutation → remote call → compensation on failure}.
//!
//! The local side — cache, state store and mutator — lives in
//! [`optifs_core`], which this crate re-exports for convenience.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use optifs_client::testing::{InMemoryProvider, RecordingNotifier};
//! use optifs_client::{ClientTelemetry, OpOutcome, OptimisticFileSystem};
//! use optifs_core::ClientFileSystem;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let telemetry = Arc::new(ClientTelemetry::new());
//! let fs = OptimisticFileSystem::new(
//!     InMemoryProvider::new(),
//!     ClientFileSystem::new(),
//!     Arc::new(RecordingNotifier::new()),
//!     Arc::clone(&telemetry),
//! );
//!
//! fs.handle_list("/").await;
//! let outcome = fs.handle_create_folder("/reports").await;
//! assert_eq!(outcome, OpOutcome::Committed);
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod notify;
mod optimistic;
mod provider;
mod telemetry;

pub mod testing;

pub use notify::{Notifier, TracingNotifier};
pub use optimistic::{OpOutcome, OptimisticFileSystem};
pub use provider::{FileSystemProvider, ProviderError, ProviderResult};
pub use telemetry::{ClientTelemetry, TelemetrySnapshot};

pub use optifs_core as core;
