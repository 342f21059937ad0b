//! One-shot delayed execution.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::wait::{self, START_TIMEOUT, STOP_TIMEOUT};
use crate::{ErrorListener, LooperError, TaskError, report};

/// Runs a task once after a delay, on its own worker thread.
///
/// Dropping the handle cancels a pending task; a task that already started
/// runs to completion.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use keel_looper::Timeout;
///
/// let timeout = Timeout::schedule(Duration::from_millis(10), || Ok(())).unwrap();
/// std::thread::sleep(Duration::from_millis(100));
/// assert!(timeout.is_fired());
/// ```
pub struct Timeout {
    stop: Arc<AtomicBool>,
    fired: Arc<AtomicBool>,
    wake_tx: Sender<()>,
    done_rx: Receiver<()>,
    handle: Option<JoinHandle<()>>,
    cancelled: bool,
}

impl Timeout {
    /// Schedule `task` to run once after `delay`.
    ///
    /// Task errors are logged with `warn!`.
    pub fn schedule(
        delay: Duration,
        task: impl FnOnce() -> Result<(), TaskError> + Send + 'static,
    ) -> Result<Self, LooperError> {
        Self::schedule_inner(delay, Box::new(task), None)
    }

    /// Schedule with an error listener instead of the default log line.
    pub fn schedule_with(
        delay: Duration,
        task: impl FnOnce() -> Result<(), TaskError> + Send + 'static,
        listener: impl Fn(&TaskError) + Send + Sync + 'static,
    ) -> Result<Self, LooperError> {
        Self::schedule_inner(delay, Box::new(task), Some(Arc::new(listener)))
    }

    fn schedule_inner(
        delay: Duration,
        task: Box<dyn FnOnce() -> Result<(), TaskError> + Send>,
        listener: Option<ErrorListener>,
    ) -> Result<Self, LooperError> {
        let stop = Arc::new(AtomicBool::new(false));
        let fired = Arc::new(AtomicBool::new(false));
        let (started_tx, started_rx) = mpsc::channel();
        let (wake_tx, wake_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();

        let worker_stop = stop.clone();
        let worker_fired = fired.clone();
        let handle = thread::Builder::new()
            .name("keel-timeout".to_owned())
            .spawn(move || {
                let _ = started_tx.send(());
                let deadline = Instant::now() + delay;
                if wait::sleep_until(deadline, &worker_stop, &wake_rx)
                    && !worker_stop.load(Ordering::Acquire)
                {
                    worker_fired.store(true, Ordering::Release);
                    if let Err(err) = task() {
                        report(listener.as_ref(), "keel-timeout", &err);
                    }
                }
                let _ = done_tx.send(());
            })
            .map_err(LooperError::Spawn)?;

        let _ = started_rx.recv_timeout(START_TIMEOUT);
        debug!(delay_ms = delay.as_millis() as u64, "timeout scheduled");
        Ok(Self {
            stop,
            fired,
            wake_tx,
            done_rx,
            handle: Some(handle),
            cancelled: false,
        })
    }

    /// Whether the task has started executing.
    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Prevent execution if the delay has not yet elapsed.
    ///
    /// Waits (bounded) for the worker to confirm; a task already running
    /// completes regardless. Idempotent.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        self.stop.store(true, Ordering::Release);
        let _ = self.wake_tx.send(());
        if self.done_rx.recv_timeout(STOP_TIMEOUT).is_ok() {
            if let Some(handle) = self.handle.take() {
                let _ = handle.join();
            }
        } else {
            self.handle = None;
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}
