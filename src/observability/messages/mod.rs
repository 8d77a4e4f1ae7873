// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit the same event with machine-readable fields
//! through `tracing`. Messages are organized by subsystem:
//!
//! * `scheduler` - expression and task lifecycle events
//! * `agent` - worker polling and evaluation events
//!
//! # Usage Patterns
//!
//! ## Basic Logging (Human-Readable)
//! ```rust
//! use dagcalc::observability::messages::scheduler::ExpressionSubmitted;
//!
//! let msg = ExpressionSubmitted {
//!     expression_id: "expr-1",
//!     task_count: 3,
//! };
//!
//! tracing::info!("{}", msg);
//! ```
//!
//! ## Structured Logging (Machine-Readable)
//! ```rust
//! use dagcalc::observability::messages::{StructuredLog, scheduler::ExpressionSubmitted};
//!
//! // Emits the human-readable message AND the fields for querying
//! ExpressionSubmitted {
//!     expression_id: "expr-1",
//!     task_count: 3,
//! }
//! .log();
//! ```

pub mod agent;
pub mod scheduler;

use tracing::Span;

/// Messages that can emit themselves as structured log events.
///
/// # Example
/// ```rust
/// use dagcalc::observability::messages::{StructuredLog, agent::WorkerStarted};
///
/// let msg = WorkerStarted { worker_id: 0 };
///
/// // Log with fields attached, then trace further work under a span
/// msg.log();
/// let span = msg.span("worker");
/// let _guard = span.enter();
/// ```
pub trait StructuredLog {
    /// Emit the event at the level appropriate to its meaning, with the
    /// message's fields attached for querying.
    fn log(&self);

    /// Create a `tracing` span carrying this message's fields as attributes.
    fn span(&self, name: &str) -> Span;
}
