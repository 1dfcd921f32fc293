//! User-facing notification capability.
//!
//! The coordinator never propagates raw provider errors to the UI; it hands
//! a human-readable title/message pair to a [`Notifier`] instead. How that
//! pair is presented (toast, dialog, status bar) is the host's business.

use tracing::warn;

/// Receives operation-failure notifications for presentation to the user.
pub trait Notifier: Send + Sync {
    /// Present a failure with a short title and a one-line message.
    fn notify(&self, title: &str, message: &str);
}

/// Notifier that only logs, for headless hosts and tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, title: &str, message: &str) {
        warn!(title, message, "operation failed");
    }
}
