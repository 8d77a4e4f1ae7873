use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The four primitive binary operations a worker can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operation {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An argument slot of a task: either a decimal literal (kept as text until
/// dispatch) or a reference to another task whose result fills the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgSlot {
    Literal(String),
    Ref(String),
}

impl ArgSlot {
    /// Classify raw argument text: anything that parses as a decimal is a
    /// literal, everything else names a task.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.parse::<f64>().is_ok() {
            Self::Literal(text)
        } else {
            Self::Ref(text)
        }
    }

    pub fn ref_id(&self) -> Option<&str> {
        match self {
            Self::Ref(id) => Some(id),
            Self::Literal(_) => None,
        }
    }
}

/// Task lifecycle. `Error` is entered when a worker reports a failed
/// evaluation (division by zero, unsupported op).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Ready,
    InProgress,
    Done,
    Error,
}

/// A node in an expression's DAG of primitive operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub expression_id: String,
    pub operation: Operation,
    pub arg1: ArgSlot,
    pub arg2: ArgSlot,
    /// Task ids this task still waits on; shrinks monotonically.
    pub dependencies: HashSet<String>,
    pub status: TaskStatus,
    pub result: Option<f64>,
}

impl Task {
    pub fn new(id: String, expression_id: String, operation: Operation, arg1: ArgSlot, arg2: ArgSlot) -> Self {
        let dependencies: HashSet<String> = [&arg1, &arg2]
            .iter()
            .filter_map(|arg| arg.ref_id().map(str::to_owned))
            .collect();
        let status = if dependencies.is_empty() {
            TaskStatus::Ready
        } else {
            TaskStatus::Pending
        };
        Self {
            id,
            expression_id,
            operation,
            arg1,
            arg2,
            dependencies,
            status,
            result: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.dependencies.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionStatus {
    Pending,
    Done,
    Error,
}

/// A submitted expression and the ordered task list derived from it.
/// The last task is the root; its result is the expression's result.
#[derive(Debug, Clone)]
pub struct Expression {
    pub id: String,
    pub status: ExpressionStatus,
    pub result: Option<f64>,
    pub task_ids: Vec<String>,
}

impl Expression {
    pub fn root_task_id(&self) -> Option<&str> {
        self.task_ids.last().map(String::as_str)
    }
}
