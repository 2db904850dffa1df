//! Worker loop and delay enforcement
//!
//! The worker is the single consumer of the command queue. It dequeues in
//! FIFO order, enforces the inter-call delay, and awaits each callback
//! inline so that no two callbacks ever run concurrently.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};
use tracing::{debug, error};

use super::stats::StatCounters;

/// A submitted callback, boxed for the queue
pub(crate) type Job = BoxFuture<'static, ()>;

/// Commands carried on the scheduler's queue
pub(crate) enum Command {
    /// Run a callback
    Run(Job),

    /// Stop the worker. Enqueued exactly once by the closing `close()` call;
    /// FIFO order guarantees everything buffered before it drains first.
    Stop,
}

/// Delay-enforcement state, private to the worker.
///
/// `last` is the start time of the most recent execution. It is unset until
/// the first callback runs, so the first call never waits.
pub(crate) struct Pacer {
    delay: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub(crate) fn new(delay: Duration) -> Self {
        Self { delay, last: None }
    }

    /// Suspend the worker until at least `delay` has passed since the start
    /// of the previous execution, then record the new start time.
    ///
    /// Spacing is measured start-to-start: callback runtime is not added,
    /// and a callback that outlives the delay is followed immediately.
    pub(crate) async fn pace(&mut self) {
        let now = Instant::now();

        let Some(last) = self.last else {
            self.last = Some(now);
            return;
        };

        let elapsed = now.duration_since(last);
        if elapsed < self.delay {
            sleep(self.delay - elapsed).await;
        }

        self.last = Some(Instant::now());
    }
}

/// The background task behind a `Scheduler`
pub(crate) struct Worker {
    rx: mpsc::Receiver<Command>,
    pacer: Pacer,
    counters: Arc<StatCounters>,
}

impl Worker {
    pub(crate) fn new(rx: mpsc::Receiver<Command>, delay: Duration, counters: Arc<StatCounters>) -> Self {
        Self {
            rx,
            pacer: Pacer::new(delay),
            counters,
        }
    }

    /// Run until the stop marker is reached or every handle is dropped.
    ///
    /// Either way the loop ends permanently; a scheduler is never restarted.
    pub(crate) async fn run(mut self) {
        debug!("Worker::run: started");
        while let Some(cmd) = self.rx.recv().await {
            match cmd {
                Command::Run(job) => {
                    self.pacer.pace().await;
                    // A panicking callback must not end the worker loop.
                    match AssertUnwindSafe(job).catch_unwind().await {
                        Ok(()) => self.counters.record_executed(),
                        Err(panic) => {
                            self.counters.record_panicked();
                            error!(panic = panic_message(&*panic), "Worker::run: callback panicked");
                        }
                    }
                }
                Command::Stop => {
                    debug!("Worker::run: stop marker reached");
                    break;
                }
            }
        }
        debug!("Worker::run: exited");
    }
}

/// Best-effort extraction of a panic payload message
fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_pace_is_immediate() {
        let mut pacer = Pacer::new(Duration::from_secs(60));

        let start = Instant::now();
        pacer.pace().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pace_enforces_remainder_of_delay() {
        let mut pacer = Pacer::new(Duration::from_millis(100));
        pacer.pace().await;

        tokio::time::advance(Duration::from_millis(30)).await;

        let start = Instant::now();
        pacer.pace().await;
        assert_eq!(start.elapsed(), Duration::from_millis(70));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pace_skips_sleep_after_long_gap() {
        let mut pacer = Pacer::new(Duration::from_millis(100));
        pacer.pace().await;

        tokio::time::advance(Duration::from_millis(250)).await;

        let start = Instant::now();
        pacer.pace().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pace_measures_from_start_of_previous() {
        let mut pacer = Pacer::new(Duration::from_millis(100));
        pacer.pace().await;

        // A 40ms "callback" between paces: only the remaining 60ms is slept.
        tokio::time::advance(Duration::from_millis(40)).await;

        let start = Instant::now();
        pacer.pace().await;
        assert_eq!(start.elapsed(), Duration::from_millis(60));
    }

    #[test]
    fn test_panic_message_extraction() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*boxed), "boom");

        let boxed: Box<dyn Any + Send> = Box::new(String::from("kaput"));
        assert_eq!(panic_message(&*boxed), "kaput");

        let boxed: Box<dyn Any + Send> = Box::new(42u32);
        assert_eq!(panic_message(&*boxed), "<non-string panic payload>");
    }
}
