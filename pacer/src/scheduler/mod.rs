//! Single-worker scheduler
//!
//! The handle, the background worker, and the execution counters.

mod core;
mod stats;
mod worker;

pub use self::core::Scheduler;
pub use stats::SchedulerStats;
