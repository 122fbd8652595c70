//! Cancellable scheduled tasks and debouncing

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// A spawned task with a cancel handle
///
/// Dropping the handle cancels the task.
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Run `task` after `delay` on the current tokio runtime
    pub fn schedule<F>(delay: Duration, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            task.await;
        });
        Self { handle }
    }

    /// Run `task` right away
    pub fn spawn<F>(task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self::schedule(Duration::ZERO, task)
    }

    /// Cancel the task if it has not completed
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Runs only the most recent task, once `delay` has passed with no newer call
pub struct Debouncer {
    delay: Duration,
    pending: Option<ScheduledTask>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        debug!(?delay, "Debouncer::new: called");
        Self { delay, pending: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending task with `task`, restarting the quiet period
    pub fn call<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(ScheduledTask::schedule(self.delay, task));
    }

    /// Cancel the pending task, if any
    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            debug!("Debouncer::cancel: cancelling pending task");
            task.cancel();
        }
    }

    /// Whether a task is scheduled or still running
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|t| !t.is_finished())
    }
}
