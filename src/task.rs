//! Task polling utilities
//!
//! Background work (submissions, downloads) runs on the tokio runtime while the
//! UI keeps drawing frames. Each frame the owning state checks its handle here.

use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle};

/// Result of polling a task
pub enum PollResult<T> {
    /// No task to poll (task was None)
    NoTask,
    /// Task is still running
    Pending,
    /// Task finished; the handle has been taken out of the slot
    Complete(Result<T, JoinError>),
}

/// Poll an optional task handle and return its result if finished.
///
/// Never blocks. Once a result is returned the slot is `None`, so a completed
/// task is observed exactly once.
///
/// ```ignore
/// match poll_task(&mut self.task) {
///     PollResult::Complete(Ok(value)) => { /* task returned */ }
///     PollResult::Complete(Err(e)) => { /* task panicked or was aborted */ }
///     PollResult::Pending => ctx.request_repaint(),
///     PollResult::NoTask => {}
/// }
/// ```
pub fn poll_task<T>(task: &mut Option<JoinHandle<T>>) -> PollResult<T> {
    match task {
        None => PollResult::NoTask,
        Some(handle) if !handle.is_finished() => PollResult::Pending,
        Some(_) => {
            let Some(handle) = task.take() else {
                return PollResult::NoTask;
            };
            match handle.now_or_never() {
                Some(result) => PollResult::Complete(result),
                None => {
                    tracing::warn!("Task reported finished but had no result yet");
                    PollResult::Pending
                }
            }
        }
    }
}
