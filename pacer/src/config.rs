//! Scheduler configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::SchedulerError;

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Minimum delay between the starts of consecutive executions, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Capacity of the bounded submission queue
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_capacity() -> usize {
    128
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            capacity: 128,
        }
    }
}

impl SchedulerConfig {
    /// Get the enforced delay as a Duration
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Check the configuration for degenerate values
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.capacity == 0 {
            return Err(SchedulerError::ZeroCapacity);
        }
        Ok(())
    }
}

/// Compute the inter-call delay for a rate of `quantity` calls per `window`.
///
/// `rate_delay(100, Duration::from_secs(1))` is exactly 10ms. Fails with
/// [`SchedulerError::ZeroRate`] when `quantity` is zero rather than producing
/// an unbounded delay.
pub fn rate_delay(quantity: u32, window: Duration) -> Result<Duration, SchedulerError> {
    if quantity == 0 {
        return Err(SchedulerError::ZeroRate);
    }
    Ok(window / quantity)
}
