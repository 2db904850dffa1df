//! Scheduler handle
//!
//! The handle side of the scheduler: producers clone it freely and submit
//! callbacks onto the bounded queue; the spawned worker consumes them.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::config::SchedulerConfig;
use crate::error::SchedulerError;

use super::stats::{SchedulerStats, StatCounters};
use super::worker::{Command, Worker};

/// Handle to a running single-worker rate-limiting call scheduler.
///
/// Cloning is cheap; all clones feed the same queue and worker. Submitted
/// callbacks run strictly one at a time, in FIFO order, with at least the
/// configured delay between the starts of consecutive executions. The
/// worker ends when [`close`](Self::close) drains the queue or when every
/// handle has been dropped.
#[derive(Clone)]
pub struct Scheduler {
    tx: mpsc::Sender<Command>,
    closed: Arc<AtomicBool>,
    counters: Arc<StatCounters>,
}

impl Scheduler {
    /// Create a scheduler and start its worker immediately.
    ///
    /// `delay` is the minimum start-to-start spacing (zero means callbacks
    /// are serialized but not spaced). `capacity` bounds the number of
    /// buffered callbacks; submission blocks when the queue is full.
    pub fn new(delay: Duration, capacity: usize) -> Result<Self, SchedulerError> {
        debug!(?delay, capacity, "Scheduler::new: called");
        if capacity == 0 {
            return Err(SchedulerError::ZeroCapacity);
        }
        Ok(Self::start(delay, capacity))
    }

    /// Create a scheduler from a [`SchedulerConfig`]
    pub fn spawn(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        debug!(?config, "Scheduler::spawn: called");
        config.validate()?;
        Ok(Self::start(config.delay(), config.capacity))
    }

    fn start(delay: Duration, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        let counters = Arc::new(StatCounters::default());

        tokio::spawn(Worker::new(rx, delay, Arc::clone(&counters)).run());
        debug!(?delay, capacity, "Scheduler::start: worker spawned");

        Self {
            tx,
            closed: Arc::new(AtomicBool::new(false)),
            counters,
        }
    }

    /// Enqueue a callback for paced execution.
    ///
    /// Fails immediately with [`SchedulerError::Closed`] once the scheduler
    /// is closed. While the queue is at capacity this suspends the caller
    /// (backpressure) rather than dropping or erroring. Success means the
    /// callback will run in FIFO order unless the scheduler closes first.
    pub async fn submit<F>(&self, task: F) -> Result<(), SchedulerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.closed.load(Ordering::Acquire) {
            debug!("Scheduler::submit: rejected, scheduler closed");
            return Err(SchedulerError::Closed);
        }

        self.tx
            .send(Command::Run(Box::pin(task)))
            .await
            .map_err(|_| SchedulerError::Closed)?;

        self.counters.record_submitted(self.pending());
        Ok(())
    }

    /// Enqueue a callback and suspend until it has finished executing.
    ///
    /// Each call gets its own private completion signal, independent of the
    /// queue, so a full queue blocking `submit` cannot deadlock the wait.
    /// Enqueue failure propagates without running the callback; a callback
    /// dropped before completion (closed under it, or panicked) yields
    /// [`SchedulerError::Abandoned`].
    pub async fn submit_and_wait<F>(&self, task: F) -> Result<(), SchedulerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();

        self.submit(async move {
            task.await;
            // Receiver may have gone away; the callback itself still ran.
            let _ = done_tx.send(());
        })
        .await?;

        done_rx.await.map_err(|_| SchedulerError::Abandoned)
    }

    /// Number of callbacks currently buffered, excluding any in flight.
    ///
    /// A snapshot only; it may be stale by the time it is read.
    pub fn pending(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// Snapshot of the scheduler's execution counters
    pub fn stats(&self) -> SchedulerStats {
        self.counters.snapshot()
    }

    /// Close the scheduler: reject new submissions, drain the backlog, stop.
    ///
    /// Exactly one caller observes `true`, no matter how many race; every
    /// later call returns `false`. Callbacks buffered before the close still
    /// run, in order and with normal pacing, before the worker exits.
    pub async fn close(&self) -> bool {
        if self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Scheduler::close: already closed");
            return false;
        }

        debug!("Scheduler::close: draining backlog and stopping worker");
        // The stop marker queues behind everything already buffered; if the
        // worker is already gone there is nothing left to stop.
        let _ = self.tx.send(Command::Stop).await;
        true
    }
}
