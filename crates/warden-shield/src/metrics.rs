//! Metrics for admission gate operations
//!
//! Counts how lookups were resolved so operators can see how much store
//! traffic the filter absorbs.
//!
//! ## Usage
//!
//! ```ignore
//! use warden_shield::metrics::GateMetrics;
//!
//! let metrics = GateMetrics::new();
//! metrics.record_filter_rejection(elapsed);
//! let snapshot = metrics.snapshot();
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

use crate::error::StoreError;

/// Thread-safe counters for gate lookups
#[derive(Default)]
pub struct GateMetrics {
    /// Total checks served
    pub checks: AtomicU64,
    /// Checks answered "absent" by the filter alone
    pub filter_rejections: AtomicU64,
    /// Checks delegated to the store
    pub store_lookups: AtomicU64,
    /// Store lookups that found the key
    pub store_hits: AtomicU64,
    /// Store lookups that did not find the key
    pub store_misses: AtomicU64,
    /// Store lookups that failed
    pub store_errors: AtomicU64,
    /// Store lookups that timed out (subset of store_errors)
    pub store_timeouts: AtomicU64,
    /// Cumulative check time in nanoseconds
    pub check_time_ns: AtomicU64,
}

impl GateMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_check(&self, duration: Duration) {
        self.checks.fetch_add(1, Ordering::Relaxed);
        self.check_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Record a check the filter answered on its own
    pub fn record_filter_rejection(&self, duration: Duration) {
        self.record_check(duration);
        self.filter_rejections.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a check that reached the store
    pub fn record_store_lookup(&self, duration: Duration, result: &Result<bool, StoreError>) {
        self.record_check(duration);
        self.store_lookups.fetch_add(1, Ordering::Relaxed);
        match result {
            Ok(true) => self.store_hits.fetch_add(1, Ordering::Relaxed),
            Ok(false) => self.store_misses.fetch_add(1, Ordering::Relaxed),
            Err(e) => {
                if *e == StoreError::Timeout {
                    self.store_timeouts.fetch_add(1, Ordering::Relaxed);
                }
                self.store_errors.fetch_add(1, Ordering::Relaxed)
            }
        };
    }

    pub fn avg_check_time_ns(&self) -> u64 {
        let total = self.check_time_ns.load(Ordering::Relaxed);
        let count = self.checks.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Share of checks that never touched the store
    pub fn filter_rejection_rate(&self) -> f64 {
        let total = self.checks.load(Ordering::Relaxed);
        let rejected = self.filter_rejections.load(Ordering::Relaxed);
        if total > 0 {
            rejected as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            checks: self.checks.load(Ordering::Relaxed),
            filter_rejections: self.filter_rejections.load(Ordering::Relaxed),
            store_lookups: self.store_lookups.load(Ordering::Relaxed),
            store_hits: self.store_hits.load(Ordering::Relaxed),
            store_misses: self.store_misses.load(Ordering::Relaxed),
            store_errors: self.store_errors.load(Ordering::Relaxed),
            store_timeouts: self.store_timeouts.load(Ordering::Relaxed),
            avg_check_ns: self.avg_check_time_ns(),
            filter_rejection_rate: self.filter_rejection_rate(),
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, Serialize)]
pub struct MetricsSnapshot {
    pub checks: u64,
    pub filter_rejections: u64,
    pub store_lookups: u64,
    pub store_hits: u64,
    pub store_misses: u64,
    pub store_errors: u64,
    pub store_timeouts: u64,
    pub avg_check_ns: u64,
    pub filter_rejection_rate: f64,
}
