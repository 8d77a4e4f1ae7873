//! The worker polling loop.
//!
//! Each worker repeatedly claims a task, sleeps the task's modeled
//! `operation_time`, computes the scalar result, and posts it back. Empty
//! polls and transport failures back off; a shutdown token drains the pool
//! cleanly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::observability::messages::agent::{
    CoordinatorOffline, TaskReceived, TaskSolved, WorkerStarted,
};
use crate::observability::messages::StructuredLog;
use crate::protocol::{TaskPayload, TaskReport};

use super::client::Coordinator;

/// Backoff after an empty poll.
const IDLE_BACKOFF: Duration = Duration::from_millis(350);
/// Backoff after a transport failure.
const OFFLINE_BACKOFF: Duration = Duration::from_millis(200);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("unsupported operation '{0}'")]
    UnsupportedOperation(String),
}

/// Compute one primitive operation.
///
/// Non-finite operands propagate per IEEE-754; only a zero divisor is an
/// error.
pub fn compute(operation: &str, arg1: f64, arg2: f64) -> Result<f64, EvalError> {
    match operation {
        "+" => Ok(arg1 + arg2),
        "-" => Ok(arg1 - arg2),
        "*" => Ok(arg1 * arg2),
        "/" if arg2 == 0.0 => Err(EvalError::DivisionByZero),
        "/" => Ok(arg1 / arg2),
        other => Err(EvalError::UnsupportedOperation(other.to_owned())),
    }
}

/// Evaluate a claimed task, honoring its modeled latency.
///
/// Division by zero is detected before sleeping; there is no point paying
/// the modeled cost for work that cannot produce a value.
async fn solve(task: &TaskPayload) -> Result<f64, EvalError> {
    if task.operation == "/" && task.arg2 == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    sleep(Duration::from_millis(task.operation_time)).await;
    compute(&task.operation, task.arg1, task.arg2)
}

/// Run `computing_power` polling workers until `shutdown` fires.
pub async fn run(
    coordinator: Arc<dyn Coordinator>,
    computing_power: usize,
    shutdown: CancellationToken,
) {
    let offline = Arc::new(AtomicBool::new(false));

    let mut workers = Vec::with_capacity(computing_power);
    for worker_id in 0..computing_power {
        let coordinator = coordinator.clone();
        let shutdown = shutdown.clone();
        let offline = offline.clone();
        workers.push(tokio::spawn(worker_loop(
            worker_id,
            coordinator,
            shutdown,
            offline,
        )));
    }

    for worker in workers {
        let _ = worker.await;
    }
}

async fn worker_loop(
    worker_id: usize,
    coordinator: Arc<dyn Coordinator>,
    shutdown: CancellationToken,
    offline: Arc<AtomicBool>,
) {
    WorkerStarted { worker_id }.log();

    loop {
        let fetched = tokio::select! {
            _ = shutdown.cancelled() => break,
            fetched = coordinator.fetch_task() => fetched,
        };

        match fetched {
            Err(err) => {
                // one warning per outage, not one per poll per worker
                if !offline.swap(true, Ordering::Relaxed) {
                    CoordinatorOffline {
                        url: coordinator.endpoint(),
                    }
                    .log();
                }
                debug!(worker_id, error = %err, "poll failed");
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = sleep(OFFLINE_BACKOFF) => {}
                }
            }
            Ok(None) => {
                offline.store(false, Ordering::Relaxed);
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = sleep(IDLE_BACKOFF) => {}
                }
            }
            Ok(Some(task)) => {
                offline.store(false, Ordering::Relaxed);
                TaskReceived {
                    worker_id,
                    task_id: &task.id,
                    operation: &task.operation,
                }
                .log();

                let report = match solve(&task).await {
                    Ok(result) => {
                        TaskSolved {
                            worker_id,
                            task_id: &task.id,
                            result,
                        }
                        .log();
                        TaskReport::success(&task.id, result)
                    }
                    Err(err) => {
                        warn!(worker_id, task_id = %task.id, error = %err, "task evaluation failed");
                        TaskReport::failure(&task.id, err.to_string())
                    }
                };

                if let Err(err) = coordinator.submit(report).await {
                    error!(worker_id, task_id = %task.id, error = %err, "failed to submit report");
                }
            }
        }
    }

    debug!(worker_id, "worker stopped");
}
