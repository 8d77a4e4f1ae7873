// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for worker polling and evaluation events.

use std::fmt::{Display, Formatter};

use tracing::Span;

use crate::observability::messages::StructuredLog;

/// A polling worker loop came up.
pub struct WorkerStarted {
    pub worker_id: usize,
}

impl Display for WorkerStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Worker #{} started", self.worker_id)
    }
}

impl StructuredLog for WorkerStarted {
    fn log(&self) {
        tracing::info!(worker_id = self.worker_id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("worker_started", span_name = name, worker_id = self.worker_id)
    }
}

/// A worker claimed a task and is about to evaluate it.
pub struct TaskReceived<'a> {
    pub worker_id: usize,
    pub task_id: &'a str,
    pub operation: &'a str,
}

impl Display for TaskReceived<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker #{} processing task {} ({})",
            self.worker_id, self.task_id, self.operation
        )
    }
}

impl StructuredLog for TaskReceived<'_> {
    fn log(&self) {
        tracing::info!(
            worker_id = self.worker_id,
            task_id = self.task_id,
            operation = self.operation,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "task_received",
            span_name = name,
            worker_id = self.worker_id,
            task_id = self.task_id,
            operation = self.operation,
        )
    }
}

/// A worker finished a task and submitted the result.
pub struct TaskSolved<'a> {
    pub worker_id: usize,
    pub task_id: &'a str,
    pub result: f64,
}

impl Display for TaskSolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker #{} completed task {} with result {}",
            self.worker_id, self.task_id, self.result
        )
    }
}

impl StructuredLog for TaskSolved<'_> {
    fn log(&self) {
        tracing::info!(
            worker_id = self.worker_id,
            task_id = self.task_id,
            result = self.result,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "task_solved",
            span_name = name,
            worker_id = self.worker_id,
            task_id = self.task_id,
            result = self.result,
        )
    }
}

/// The orchestrator stopped answering; logged once per outage, not per poll.
///
/// # Log Level
/// `warn!` - workers keep retrying with backoff
///
/// # Example
/// ```rust
/// use dagcalc::observability::messages::{StructuredLog, agent::CoordinatorOffline};
///
/// CoordinatorOffline {
///     url: "http://localhost:8080",
/// }
/// .log();
/// ```
pub struct CoordinatorOffline<'a> {
    pub url: &'a str,
}

impl Display for CoordinatorOffline<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cannot reach orchestrator at {}. Will retry", self.url)
    }
}

impl StructuredLog for CoordinatorOffline<'_> {
    fn log(&self) {
        tracing::warn!(url = self.url, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("coordinator_offline", span_name = name, url = self.url)
    }
}
