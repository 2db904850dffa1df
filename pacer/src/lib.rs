//! Pacer - single-worker rate-limiting call scheduler
//!
//! Pacer throttles calls to rate-limited external resources. Callers submit
//! zero-argument callbacks (futures); a single background worker executes
//! them strictly one at a time, enforcing a minimum delay between the starts
//! of consecutive executions. Submission is non-blocking up to a bounded
//! queue, then applies backpressure.
//!
//! # Core Concepts
//!
//! - **One Worker**: callbacks never run concurrently with each other
//! - **FIFO**: callbacks run in exact submission order
//! - **Start-to-Start Pacing**: callback runtime is not added to the spacing
//! - **Drain on Close**: callbacks buffered at close time still run
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use pacer::{Scheduler, rate_delay};
//!
//! # async fn demo() -> Result<(), pacer::SchedulerError> {
//! // At most 10 calls per second to the upstream API.
//! let delay = rate_delay(10, Duration::from_secs(1))?;
//! let scheduler = Scheduler::new(delay, 64)?;
//!
//! scheduler.submit(async { /* call the API */ }).await?;
//! scheduler.submit_and_wait(async { /* runs before this returns */ }).await?;
//!
//! scheduler.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`scheduler`] - the scheduler handle and its worker
//! - [`config`] - configuration and the rate helper
//! - [`error`] - error types

pub mod config;
pub mod error;
pub mod scheduler;

// Re-export commonly used types
pub use config::{SchedulerConfig, rate_delay};
pub use error::SchedulerError;
pub use scheduler::{Scheduler, SchedulerStats};
