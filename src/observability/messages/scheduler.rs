// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for expression and task lifecycle events.

use std::fmt::{Display, Formatter};

use tracing::Span;

use crate::observability::messages::StructuredLog;

/// An expression was parsed and its tasks installed.
///
/// # Log Level
/// `info!` - important operational event
///
/// # Example
/// ```rust
/// use dagcalc::observability::messages::scheduler::ExpressionSubmitted;
///
/// let msg = ExpressionSubmitted {
///     expression_id: "expr-1",
///     task_count: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ExpressionSubmitted<'a> {
    pub expression_id: &'a str,
    pub task_count: usize,
}

impl Display for ExpressionSubmitted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Expression {} submitted with {} tasks",
            self.expression_id, self.task_count
        )
    }
}

impl StructuredLog for ExpressionSubmitted<'_> {
    fn log(&self) {
        tracing::info!(
            expression_id = self.expression_id,
            task_count = self.task_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "expression_submitted",
            span_name = name,
            expression_id = self.expression_id,
            task_count = self.task_count,
        )
    }
}

/// A worker's result closed out a task.
///
/// # Log Level
/// `debug!` - high-volume steady-state event
pub struct TaskCompleted<'a> {
    pub task_id: &'a str,
    pub result: f64,
}

impl Display for TaskCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task {} completed with result {}", self.task_id, self.result)
    }
}

impl StructuredLog for TaskCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            task_id = self.task_id,
            result = self.result,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "task_completed",
            span_name = name,
            task_id = self.task_id,
            result = self.result,
        )
    }
}

/// Every task of an expression finished; the root's result is final.
///
/// # Log Level
/// `info!` - important operational event
pub struct ExpressionCompleted<'a> {
    pub expression_id: &'a str,
    pub result: f64,
}

impl Display for ExpressionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Expression {} completed with result {}",
            self.expression_id, self.result
        )
    }
}

impl StructuredLog for ExpressionCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            expression_id = self.expression_id,
            result = self.result,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "expression_completed",
            span_name = name,
            expression_id = self.expression_id,
            result = self.result,
        )
    }
}

/// A worker reported a failed evaluation; the expression is dead.
///
/// # Log Level
/// `warn!` - expected with bad input, needs no operator action
pub struct ExpressionFailed<'a> {
    pub expression_id: &'a str,
    pub task_id: &'a str,
    pub reason: &'a str,
}

impl Display for ExpressionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Expression {} failed at task {}: {}",
            self.expression_id, self.task_id, self.reason
        )
    }
}

impl StructuredLog for ExpressionFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            expression_id = self.expression_id,
            task_id = self.task_id,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "expression_failed",
            span_name = name,
            expression_id = self.expression_id,
            task_id = self.task_id,
            reason = self.reason,
        )
    }
}
