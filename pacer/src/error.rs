//! Scheduler errors

use thiserror::Error;

/// Errors from scheduler operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// The scheduler has been closed; no new callbacks are accepted.
    #[error("scheduler is closed")]
    Closed,

    /// A waited-on callback was dropped before it could signal completion,
    /// either because the scheduler closed under it or because it panicked.
    #[error("callback abandoned before completion")]
    Abandoned,

    /// `rate_delay` needs at least one call per window.
    #[error("rate quantity must be greater than zero")]
    ZeroRate,

    /// The bounded queue needs at least one slot.
    #[error("queue capacity must be greater than zero")]
    ZeroCapacity,
}
