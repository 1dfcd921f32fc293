//! Telemetry for the optimistic coordinator.
//!
//! [`ClientTelemetry`] is injected at construction and shared by reference;
//! there is no process-wide static. The instance gauge exists
//! to diagnose duplicate-wiring bugs in the hosting UI (two coordinators
//! driving one view); it is observational only and plays no part in
//! correctness.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::info;

/// Shared, lock-free counters for coordinator activity.
#[derive(Debug, Default)]
pub struct ClientTelemetry {
    instances: AtomicU64,
    committed: AtomicU64,
    rolled_back: AtomicU64,
    errors_suppressed: AtomicU64,
}

impl ClientTelemetry {
    /// Create zeroed telemetry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a coordinator being constructed.
    pub fn instance_created(&self) {
        let now = self.instances.fetch_add(1, Ordering::Relaxed) + 1;
        info!(instances = now, "coordinator instance created");
    }

    /// Record a coordinator being dropped.
    pub fn instance_dropped(&self) {
        let now = self.instances.fetch_sub(1, Ordering::Relaxed).saturating_sub(1);
        info!(instances = now, "coordinator instance dropped");
    }

    /// Record an operation that committed.
    #[inline]
    pub fn record_committed(&self) {
        self.committed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an operation that was rolled back (or failed with no
    /// compensation defined).
    #[inline]
    pub fn record_rolled_back(&self) {
        self.rolled_back.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an API-classified error suppressed from notification.
    #[inline]
    pub fn record_error_suppressed(&self) {
        self.errors_suppressed.fetch_add(1, Ordering::Relaxed);
    }

    /// Live coordinator instances.
    pub fn instances(&self) -> u64 {
        self.instances.load(Ordering::Relaxed)
    }

    /// Operations committed so far.
    pub fn committed(&self) -> u64 {
        self.committed.load(Ordering::Relaxed)
    }

    /// Operations rolled back so far.
    pub fn rolled_back(&self) -> u64 {
        self.rolled_back.load(Ordering::Relaxed)
    }

    /// API-classified errors suppressed so far.
    pub fn errors_suppressed(&self) -> u64 {
        self.errors_suppressed.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            instances: self.instances(),
            committed: self.committed(),
            rolled_back: self.rolled_back(),
            errors_suppressed: self.errors_suppressed(),
        }
    }
}

/// A serializable snapshot of [`ClientTelemetry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Live coordinator instances.
    pub instances: u64,
    /// Operations committed.
    pub committed: u64,
    /// Operations rolled back.
    pub rolled_back: u64,
    /// API-classified errors suppressed from notification.
    pub errors_suppressed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_gauge_tracks_lifecycle() {
        let telemetry = ClientTelemetry::new();
        telemetry.instance_created();
        telemetry.instance_created();
        telemetry.instance_dropped();
        assert_eq!(telemetry.instances(), 1);
    }

    #[test]
    fn counters_accumulate() {
        let telemetry = ClientTelemetry::new();
        telemetry.record_committed();
        telemetry.record_committed();
        telemetry.record_rolled_back();
        telemetry.record_error_suppressed();

        let snapshot = telemetry.snapshot();
        assert_eq!(snapshot.committed, 2);
        assert_eq!(snapshot.rolled_back, 1);
        assert_eq!(snapshot.errors_suppressed, 1);
    }

    #[test]
    fn snapshot_serializes() {
        let telemetry = ClientTelemetry::new();
        telemetry.record_committed();
        let json = serde_json::to_string(&telemetry.snapshot()).unwrap();
        assert!(json.contains("\"committed\":1"));
    }
}
