//! Periodic task scheduling.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::{Instant, interval_at};
use tracing::trace;

use crate::error::{Error, Result};

/// Work executed on every tick of a schedule.
#[async_trait]
pub trait PeriodicTask: Send + Sync + 'static {
    /// Run one iteration.
    async fn run(&self);

    /// Name used in logs.
    fn name(&self) -> &str {
        "periodic-task"
    }
}

/// Something that can run tasks at a fixed rate.
pub trait Scheduler: Send + Sync {
    /// Run `task` once after `initial_delay` and then every `period`.
    fn schedule_at_fixed_rate(
        &self,
        task: Arc<dyn PeriodicTask>,
        initial_delay: Duration,
        period: Duration,
    ) -> Result<ScheduledTask>;
}

/// Shared handle to a scheduler.
pub type SharedScheduler = Arc<dyn Scheduler>;

/// Handle to a scheduled task.
///
/// Dropping the handle leaves the task running; call [`cancel`](Self::cancel)
/// to stop it.
#[derive(Debug)]
pub struct ScheduledTask {
    abort: AbortHandle,
}

impl ScheduledTask {
    pub fn new(abort: AbortHandle) -> Self {
        Self { abort }
    }

    /// Stop future runs. An iteration in progress is aborted at its next
    /// await point.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// Whether the task has stopped.
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Scheduler backed by the Tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler {
    handle: Option<Handle>,
}

impl TokioScheduler {
    /// Schedule onto whichever runtime is current when a task is scheduled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule onto a specific runtime.
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    fn runtime(&self) -> Result<Handle> {
        match &self.handle {
            Some(handle) => Ok(handle.clone()),
            None => Handle::try_current().map_err(|e| Error::Scheduler(e.to_string())),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_at_fixed_rate(
        &self,
        task: Arc<dyn PeriodicTask>,
        initial_delay: Duration,
        period: Duration,
    ) -> Result<ScheduledTask> {
        if period.is_zero() {
            return Err(Error::Scheduler("period must be greater than zero".into()));
        }
        let runtime = self.runtime()?;

        // Both the first deadline and the one after it must be representable
        let start = Instant::now()
            .checked_add(initial_delay)
            .filter(|start| start.checked_add(period).is_some())
            .ok_or_else(|| Error::Scheduler("schedule lies beyond the clock's range".into()))?;

        let join = runtime.spawn(async move {
            let mut ticker = interval_at(start, period);
            loop {
                ticker.tick().await;
                trace!(task = task.name(), "Running scheduled task");
                task.run().await;
            }
        });

        Ok(ScheduledTask::new(join.abort_handle()))
    }
}
