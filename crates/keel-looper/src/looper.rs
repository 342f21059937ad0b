//! Repeating background worker.
//!
//! # State machine
//!
//! ```text
//! Created --start()--> Running --stop()--> Stopped
//! ```
//!
//! `start` blocks (bounded) until the worker thread signals it has begun;
//! a missing signal is tolerated silently. `stop` sets the stop flag,
//! wakes the worker, and waits (bounded) for its done-signal; after the
//! timeout it returns regardless, leaving the worker to finish detached.
//! A stopped instance cannot be restarted.
//!
//! # Failure containment
//!
//! Task errors go to the registered listener, or a `warn!` line when none
//! is set; they never propagate to the owning thread. With
//! `break_on_error` the loop exits on the first failure. In continuous
//! mode, two failures within [`FAILURE_WINDOW`] trigger a
//! [`FAILURE_COOLDOWN`] sleep so a permanently failing task does not spin.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use keel_util::params::{self, ParamError};
use tracing::debug;

use crate::wait::{self, START_TIMEOUT, STOP_TIMEOUT};
use crate::{ErrorListener, LooperError, TaskError, report};

/// Two task failures closer together than this count as busy-failing.
pub const FAILURE_WINDOW: Duration = Duration::from_secs(1);

/// Cooldown inserted between iterations when continuous mode busy-fails.
pub const FAILURE_COOLDOWN: Duration = Duration::from_secs(4);

type Task = Box<dyn FnMut() -> Result<(), TaskError> + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Created,
    Running,
    Stopped,
}

/// A dedicated thread invoking a task repeatedly.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
/// use keel_looper::Looper;
///
/// let counter = Arc::new(AtomicUsize::new(0));
/// let seen = counter.clone();
/// let mut looper = Looper::periodic(Duration::from_millis(10), move || {
///     seen.fetch_add(1, Ordering::Relaxed);
///     Ok(())
/// })
/// .unwrap();
///
/// looper.start().unwrap();
/// std::thread::sleep(Duration::from_millis(50));
/// looper.stop();
/// assert!(counter.load(Ordering::Relaxed) >= 1);
/// ```
pub struct Looper {
    period: Duration, // zero = continuous
    break_on_error: bool,
    listener: Option<ErrorListener>,
    thread_name: String,
    task: Option<Task>,
    state: State,
    stop: Arc<AtomicBool>,
    wake_tx: Option<Sender<()>>,
    done_rx: Option<Receiver<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Looper {
    /// A continuous worker: iterations run back-to-back.
    pub fn continuous(task: impl FnMut() -> Result<(), TaskError> + Send + 'static) -> Self {
        Self::build(Duration::ZERO, Box::new(task))
    }

    /// A periodic worker with a fixed, non-zero period.
    pub fn periodic(
        period: Duration,
        task: impl FnMut() -> Result<(), TaskError> + Send + 'static,
    ) -> Result<Self, ParamError> {
        params::positive(period, "period")?;
        Ok(Self::build(period, Box::new(task)))
    }

    fn build(period: Duration, task: Task) -> Self {
        Self {
            period,
            break_on_error: false,
            listener: None,
            thread_name: "keel-looper".to_owned(),
            task: Some(task),
            state: State::Created,
            stop: Arc::new(AtomicBool::new(false)),
            wake_tx: None,
            done_rx: None,
            handle: None,
        }
    }

    /// Exit the loop on the first task failure instead of continuing.
    #[must_use]
    pub fn break_on_error(mut self, flag: bool) -> Self {
        self.break_on_error = flag;
        self
    }

    /// Receive task failures instead of the default `warn!` line. Invoked
    /// on the worker thread.
    #[must_use]
    pub fn on_error(mut self, listener: impl Fn(&TaskError) + Send + Sync + 'static) -> Self {
        self.listener = Some(Arc::new(listener));
        self
    }

    /// Worker thread name, visible in panics and profilers.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Whether the worker is in the running state.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    /// Spawn the worker thread and wait (bounded) for it to begin.
    ///
    /// A worker that fails to signal within the wait simply means `start`
    /// returns before the first iteration; that is tolerated silently.
    pub fn start(&mut self) -> Result<(), LooperError> {
        match self.state {
            State::Created => {}
            State::Running => return Err(LooperError::AlreadyRunning),
            State::Stopped => return Err(LooperError::AlreadyStopped),
        }

        // A Created looper always still holds its task.
        let task = self.task.take().expect("task present before first start");
        let (started_tx, started_rx) = mpsc::channel();
        let (wake_tx, wake_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();

        let mut worker = Worker {
            task,
            period: self.period,
            break_on_error: self.break_on_error,
            listener: self.listener.clone(),
            name: self.thread_name.clone(),
            stop: self.stop.clone(),
            wake_rx,
        };

        let handle = thread::Builder::new()
            .name(self.thread_name.clone())
            .spawn(move || {
                let _ = started_tx.send(());
                worker.run();
                let _ = done_tx.send(());
            })
            .map_err(LooperError::Spawn)?;

        let _ = started_rx.recv_timeout(START_TIMEOUT);
        self.wake_tx = Some(wake_tx);
        self.done_rx = Some(done_rx);
        self.handle = Some(handle);
        self.state = State::Running;
        debug!(worker = %self.thread_name, period_ms = self.period.as_millis() as u64, "looper started");
        Ok(())
    }

    /// Request the worker to stop and wait (bounded) for it to finish.
    ///
    /// Returns once the worker signalled completion or the stop timeout
    /// elapsed, whichever comes first. Idempotent; a never-started looper
    /// just transitions to stopped.
    pub fn stop(&mut self) {
        if self.state != State::Running {
            self.state = State::Stopped;
            return;
        }
        self.stop.store(true, Ordering::Release);
        if let Some(wake) = &self.wake_tx {
            let _ = wake.send(());
        }

        let finished = self
            .done_rx
            .as_ref()
            .is_some_and(|rx| rx.recv_timeout(STOP_TIMEOUT).is_ok());
        if finished {
            if let Some(handle) = self.handle.take() {
                let _ = handle.join();
            }
        } else {
            // Worker did not confirm in time; drop the handle and let the
            // thread finish detached.
            self.handle = None;
        }
        self.state = State::Stopped;
        debug!(worker = %self.thread_name, confirmed = finished, "looper stopped");
    }
}

impl Drop for Looper {
    fn drop(&mut self) {
        if self.state == State::Running {
            self.stop();
        }
    }
}

struct Worker {
    task: Task,
    period: Duration,
    break_on_error: bool,
    listener: Option<ErrorListener>,
    name: String,
    stop: Arc<AtomicBool>,
    wake_rx: Receiver<()>,
}

impl Worker {
    fn run(&mut self) {
        let mut last_failure: Option<Instant> = None;
        let mut deadline = Instant::now();

        loop {
            if self.stop.load(Ordering::Acquire) {
                return;
            }

            match (self.task)() {
                Ok(()) => last_failure = None,
                Err(err) => {
                    report(self.listener.as_ref(), &self.name, &err);
                    if self.break_on_error {
                        return;
                    }
                    if self.period.is_zero() {
                        let now = Instant::now();
                        let busy_failing = last_failure
                            .is_some_and(|previous| now.duration_since(previous) < FAILURE_WINDOW);
                        last_failure = Some(now);
                        if busy_failing
                            && !wait::sleep_until(now + FAILURE_COOLDOWN, &self.stop, &self.wake_rx)
                        {
                            return;
                        }
                    }
                }
            }

            if !self.period.is_zero() {
                // Schedule from the previous deadline so the period does
                // not drift; an overrunning task runs again immediately.
                deadline += self.period;
                let now = Instant::now();
                if deadline < now {
                    deadline = now;
                }
                if !wait::sleep_until(deadline, &self.stop, &self.wake_rx) {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    fn counting_task(counter: Arc<AtomicUsize>) -> impl FnMut() -> Result<(), TaskError> + Send {
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn double_start_rejected() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut looper = Looper::periodic(Duration::from_millis(50), counting_task(counter)).unwrap();
        looper.start().unwrap();
        assert!(matches!(looper.start(), Err(LooperError::AlreadyRunning)));
        looper.stop();
    }

    #[test]
    fn restart_after_stop_rejected() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut looper = Looper::continuous(counting_task(counter));
        looper.start().unwrap();
        looper.stop();
        assert!(matches!(looper.start(), Err(LooperError::AlreadyStopped)));
    }

    #[test]
    fn zero_period_rejected() {
        let result = Looper::periodic(Duration::ZERO, || Ok(()));
        assert!(result.is_err());
    }

    #[test]
    fn stop_without_start_is_fine() {
        let mut looper = Looper::continuous(|| Ok(()));
        looper.stop();
        assert!(!looper.is_running());
        assert!(matches!(looper.start(), Err(LooperError::AlreadyStopped)));
    }

    #[test]
    fn break_on_error_exits_after_first_failure() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(Mutex::new(Vec::new()));

        let task_attempts = attempts.clone();
        let listener_errors = errors.clone();
        let mut looper = Looper::continuous(move || {
            task_attempts.fetch_add(1, Ordering::SeqCst);
            Err("boom".into())
        })
        .break_on_error(true)
        .on_error(move |err| listener_errors.lock().unwrap().push(err.to_string()));

        looper.start().unwrap();
        // The worker may not have reached its first iteration yet; give it
        // time to fail once before stopping.
        let deadline = Instant::now() + Duration::from_secs(5);
        while attempts.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        looper.stop();

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(errors.lock().unwrap().as_slice(), ["boom".to_owned()]);
    }
}
