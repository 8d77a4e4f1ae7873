use crate::engine::task::Task;
use crate::errors::ScheduleError;
use crate::protocol::{ExpressionSummary, TaskPayload};

/// The dependency-scheduled task engine behind the HTTP surface.
///
/// One process-wide instance owns all graph state. The transport layer only
/// talks through this trait, so tests can substitute a deterministic
/// in-memory double. No method performs I/O or suspends; each completes in
/// bounded work proportional to the DAG size it touches.
///
/// # Example
/// ```rust
/// use dagcalc::config::OperationTimes;
/// use dagcalc::engine::Scheduler;
/// use dagcalc::traits::TaskScheduler;
///
/// let scheduler = Scheduler::new(OperationTimes::default());
/// scheduler.submit("2+2*2").unwrap();
///
/// // the multiply has no task dependencies, so it is claimable at once
/// let task = scheduler.claim().expect("leaf task is ready");
/// let payload = scheduler.resolve(&task);
/// assert_eq!(payload.operation, "*");
///
/// scheduler.complete(&task.id, payload.arg1 * payload.arg2).unwrap();
/// ```
pub trait TaskScheduler: Send + Sync {
    /// Parse `expression` into a task DAG and install it.
    ///
    /// Returns the new expression id. On failure nothing is installed.
    fn submit(&self, expression: &str) -> Result<String, ScheduleError>;

    /// Hand out one ready task, FIFO over enqueue order. Non-blocking;
    /// `None` when no task is ready. The returned task is `InProgress`
    /// until a matching `complete` or `fail`.
    fn claim(&self) -> Option<Task>;

    /// Record a worker's result for an in-progress task, then wake any
    /// dependents whose last dependency this resolved.
    fn complete(&self, task_id: &str, result: f64) -> Result<(), ScheduleError>;

    /// Record a worker-side evaluation failure: the task and its parent
    /// expression move to the error state and dependents never become ready.
    fn fail(&self, task_id: &str, reason: &str) -> Result<(), ScheduleError>;

    /// Resolve a claimed task's arg slots to floats and attach the modeled
    /// per-operation latency, producing the payload handed to the worker.
    fn resolve(&self, task: &Task) -> TaskPayload;

    /// Unordered snapshot of every expression's `{id, status, result}`.
    fn list(&self) -> Vec<ExpressionSummary>;

    /// One expression's `{id, status, result}`, or `None` if unknown.
    fn get(&self, expression_id: &str) -> Option<ExpressionSummary>;
}
