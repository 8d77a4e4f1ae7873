// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::ParseError;

/// Errors that can occur while scheduling and completing tasks
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// The submitted expression failed to parse; nothing was installed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The ready queue is empty; normal steady-state signal for polling workers
    #[error("no tasks available")]
    NoTasksAvailable,

    /// A result or failure report named a task id the scheduler does not know
    #[error("task '{0}' not found")]
    TaskNotFound(String),

    /// A result or failure report arrived for a task no worker currently holds
    #[error("task '{0}' is not in progress")]
    TaskNotInProgress(String),

    /// The bounded ready queue is at capacity; submission is back-pressured
    #[error("ready queue is full")]
    ReadyQueueFull,
}
