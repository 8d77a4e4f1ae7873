// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Wire types shared by the orchestrator's HTTP surface and the agent.
//!
//! Arg slots are text earlier in the pipeline (a decimal literal or a task
//! id); by the time a task crosses the wire to a worker both have been
//! resolved to plain numbers.

use serde::{Deserialize, Serialize};

use crate::engine::task::ExpressionStatus;

/// A claimed task as handed to a worker: args resolved to floats, plus the
/// modeled per-operation latency in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub id: String,
    pub operation: String,
    pub arg1: f64,
    pub arg2: f64,
    pub operation_time: u64,
}

/// Envelope for `GET /internal/task` responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEnvelope {
    pub task: TaskPayload,
}

/// Body of `POST /internal/task`: exactly one of `result` and `error` must
/// be present. A result completes the task; an error marks it failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskReport {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskReport {
    pub fn success(id: impl Into<String>, result: f64) -> Self {
        Self {
            id: id.into(),
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            result: None,
            error: Some(reason.into()),
        }
    }
}

/// Registry read model: what clients see of an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionSummary {
    pub id: String,
    pub status: ExpressionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<f64>,
}
