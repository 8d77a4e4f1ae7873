pub mod client;
pub mod worker;

pub use client::{AgentError, Coordinator, HttpCoordinator};
pub use worker::{compute, run, EvalError};
