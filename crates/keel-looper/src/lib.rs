#![forbid(unsafe_code)]

//! Background task workers.
//!
//! # Role in keel
//! One dedicated worker thread per instance, never a pool:
//!
//! - [`Looper`] runs a task repeatedly, either back-to-back (continuous
//!   mode) or on a fixed period;
//! - [`Timeout`] runs a task once after a delay.
//!
//! Task errors never reach the owning thread: they go to an optional
//! listener, or a `warn!` log line when none is registered. Cancellation is
//! cooperative — a stop flag plus a wake channel — and every sleep is cut
//! into short slices so a stop request is observed promptly rather than at
//! the next period boundary.

pub mod looper;
pub mod timeout;
mod wait;

use std::fmt;
use std::io;

pub use looper::Looper;
pub use timeout::Timeout;

/// Error type tasks report with.
pub type TaskError = Box<dyn std::error::Error + Send + Sync>;

/// Observer for task failures. Invoked on the worker thread.
pub type ErrorListener = std::sync::Arc<dyn Fn(&TaskError) + Send + Sync>;

/// Lifecycle misuse or spawn failure.
#[derive(Debug)]
pub enum LooperError {
    /// `start` was called while the worker is running.
    AlreadyRunning,
    /// `start` was called on a stopped instance; create a fresh one.
    AlreadyStopped,
    /// The worker thread could not be spawned.
    Spawn(io::Error),
}

impl fmt::Display for LooperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "worker is already running"),
            Self::AlreadyStopped => {
                write!(f, "worker was stopped; a stopped instance cannot be restarted")
            }
            Self::Spawn(source) => write!(f, "cannot spawn worker thread: {source}"),
        }
    }
}

impl std::error::Error for LooperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(source) => Some(source),
            _ => None,
        }
    }
}

pub(crate) fn report(listener: Option<&ErrorListener>, context: &str, err: &TaskError) {
    match listener {
        Some(listener) => listener(err),
        None => tracing::warn!(worker = context, error = %err, "task failed"),
    }
}
