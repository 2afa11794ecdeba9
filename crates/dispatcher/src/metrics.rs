//! Relay counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one relay loop
#[derive(Debug, Default)]
pub struct RelayMetrics {
    /// Lines accepted by the sink
    relayed_count: AtomicU64,
    /// Lines the sink rejected
    failure_count: AtomicU64,
}

impl RelayMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get relayed count
    pub fn relayed_count(&self) -> u64 {
        self.relayed_count.load(Ordering::Relaxed)
    }

    /// Increment relayed count
    pub fn inc_relayed_count(&self) {
        self.relayed_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get failure count
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            relayed_count: self.relayed_count(),
            failure_count: self.failure_count(),
        }
    }
}

/// Snapshot of relay counters (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub relayed_count: u64,
    pub failure_count: u64,
}
