pub mod dag_builder;
pub mod ready_queue;
pub mod scheduler;
pub mod task;

pub use dag_builder::{build_dag, DagPlan};
pub use ready_queue::ReadyQueue;
pub use scheduler::Scheduler;
