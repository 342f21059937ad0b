//! Stop-aware sleeping shared by the workers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

/// Longest uninterrupted sleep. Stop requests are observed within one
/// slice even mid-period.
pub(crate) const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// How long `start`/`schedule` waits for the worker's started-signal.
pub(crate) const START_TIMEOUT: Duration = Duration::from_secs(2);

/// How long `stop`/`cancel` waits for the worker's done-signal before
/// returning with the worker left to finish detached.
pub(crate) const STOP_TIMEOUT: Duration = Duration::from_secs(6);

/// Sleep until `deadline`, waking early on a stop request.
///
/// Returns `false` if the sleep was cut short by a stop (flag set, wake
/// message received, or wake channel gone), `true` if the deadline was
/// reached.
pub(crate) fn sleep_until(deadline: Instant, stop: &AtomicBool, wake: &Receiver<()>) -> bool {
    loop {
        if stop.load(Ordering::Acquire) {
            return false;
        }
        let now = Instant::now();
        let Some(remaining) = deadline.checked_duration_since(now).filter(|d| !d.is_zero())
        else {
            return true;
        };
        match wake.recv_timeout(remaining.min(SLEEP_SLICE)) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return false,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }
}
