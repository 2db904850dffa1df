//! Execution counters for the scheduler

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Statistics snapshot for the scheduler
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SchedulerStats {
    pub total_submitted: u64,
    pub total_executed: u64,
    pub total_panicked: u64,
    pub peak_pending: usize,
}

/// Live counters shared between the handle and the worker.
///
/// Producers bump `submitted` and `peak_pending`; the worker bumps
/// `executed` and `panicked`. No counter has two writers racing on the
/// same semantic update, so relaxed ordering is enough.
#[derive(Debug, Default)]
pub(crate) struct StatCounters {
    submitted: AtomicU64,
    executed: AtomicU64,
    panicked: AtomicU64,
    peak_pending: AtomicUsize,
}

impl StatCounters {
    pub(crate) fn record_submitted(&self, pending: usize) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
        self.peak_pending.fetch_max(pending, Ordering::Relaxed);
    }

    pub(crate) fn record_executed(&self) {
        self.executed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_panicked(&self) {
        self.panicked.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> SchedulerStats {
        SchedulerStats {
            total_submitted: self.submitted.load(Ordering::Relaxed),
            total_executed: self.executed.load(Ordering::Relaxed),
            total_panicked: self.panicked.load(Ordering::Relaxed),
            peak_pending: self.peak_pending.load(Ordering::Relaxed),
        }
    }
}
