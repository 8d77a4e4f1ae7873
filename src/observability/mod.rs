// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Diagnostic events are struct-based messages with a `Display`
//! implementation, so the wording lives in one place and log call sites
//! stay free of format strings. Messages are organized by subsystem:
//!
//! * `messages::scheduler` - expression and task lifecycle events
//! * `messages::agent` - worker polling and evaluation events

pub mod messages;
