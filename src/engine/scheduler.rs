//! Dependency-scheduled task engine.
//!
//! One process-wide [`Scheduler`] owns every expression, task, the bounded
//! ready queue, and the in-progress set, all behind a single readers-writer
//! lock. `submit`, `claim`, `complete`, and `fail` take the write lock;
//! `resolve`, `list`, and `get` take the read lock. No lock is held across
//! I/O; every operation is bounded in-memory work.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use tracing::debug;

use crate::config::OperationTimes;
use crate::errors::ScheduleError;
use crate::observability::messages::scheduler::{
    ExpressionCompleted, ExpressionFailed, ExpressionSubmitted, TaskCompleted,
};
use crate::observability::messages::StructuredLog;
use crate::parser::{to_rpn, tokenize};
use crate::protocol::{ExpressionSummary, TaskPayload};
use crate::traits::TaskScheduler;

use super::dag_builder::{build_dag, DagPlan};
use super::ready_queue::{ReadyQueue, DEFAULT_CAPACITY};
use super::task::{ArgSlot, Expression, ExpressionStatus, Task, TaskStatus};

#[derive(Debug)]
struct SchedulerState {
    expressions: HashMap<String, Expression>,
    tasks: HashMap<String, Task>,
    ready: ReadyQueue,
    in_progress: HashSet<String>,
    expression_counter: u64,
    task_counter: u64,
}

impl SchedulerState {
    fn with_queue_capacity(capacity: usize) -> Self {
        Self {
            expressions: HashMap::new(),
            tasks: HashMap::new(),
            ready: ReadyQueue::with_capacity(capacity),
            in_progress: HashSet::new(),
            expression_counter: 0,
            task_counter: 0,
        }
    }
}

pub struct Scheduler {
    state: RwLock<SchedulerState>,
    operation_times: OperationTimes,
}

impl Scheduler {
    pub fn new(operation_times: OperationTimes) -> Self {
        Self::with_queue_capacity(operation_times, DEFAULT_CAPACITY)
    }

    pub fn with_queue_capacity(operation_times: OperationTimes, capacity: usize) -> Self {
        Self {
            state: RwLock::new(SchedulerState::with_queue_capacity(capacity)),
            operation_times,
        }
    }
}

impl TaskScheduler for Scheduler {
    fn submit(&self, expression: &str) -> Result<String, ScheduleError> {
        let mut guard = self.state.write().unwrap();
        let state = &mut *guard;

        let tokens = tokenize(expression)?;
        let rpn = to_rpn(tokens)?;

        state.expression_counter += 1;
        let expression_id = format!("expr-{}", state.expression_counter);

        let counter = &mut state.task_counter;
        let mut next_task_id = || {
            *counter += 1;
            format!("task-{counter}")
        };
        let plan = build_dag(&rpn, &expression_id, &mut next_task_id)?;

        match plan {
            DagPlan::Constant(value) => {
                // a bare literal has no work to farm out
                state.expressions.insert(
                    expression_id.clone(),
                    Expression {
                        id: expression_id.clone(),
                        status: ExpressionStatus::Done,
                        result: Some(value),
                        task_ids: Vec::new(),
                    },
                );
                ExpressionSubmitted {
                    expression_id: &expression_id,
                    task_count: 0,
                }
                .log();
            }
            DagPlan::Tasks(tasks) => {
                let leaves: Vec<String> = tasks
                    .iter()
                    .filter(|task| task.is_leaf())
                    .map(|task| task.id.clone())
                    .collect();
                if leaves.len() > state.ready.remaining() {
                    return Err(ScheduleError::ReadyQueueFull);
                }

                let task_ids: Vec<String> = tasks.iter().map(|task| task.id.clone()).collect();
                ExpressionSubmitted {
                    expression_id: &expression_id,
                    task_count: task_ids.len(),
                }
                .log();

                for task in tasks {
                    state.tasks.insert(task.id.clone(), task);
                }
                for leaf in leaves {
                    state.ready.push(leaf)?;
                }
                state.expressions.insert(
                    expression_id.clone(),
                    Expression {
                        id: expression_id.clone(),
                        status: ExpressionStatus::Pending,
                        result: None,
                        task_ids,
                    },
                );
            }
        }

        Ok(expression_id)
    }

    fn claim(&self) -> Option<Task> {
        let mut guard = self.state.write().unwrap();
        let state = &mut *guard;

        let task_id = state.ready.pop()?;
        let task = state.tasks.get_mut(&task_id)?;
        if task.status != TaskStatus::Ready {
            return None;
        }
        task.status = TaskStatus::InProgress;
        let claimed = task.clone();
        state.in_progress.insert(task_id);
        debug!(task_id = %claimed.id, operation = %claimed.operation, "task claimed");
        Some(claimed)
    }

    fn complete(&self, task_id: &str, result: f64) -> Result<(), ScheduleError> {
        let mut guard = self.state.write().unwrap();
        let state = &mut *guard;

        let task = state
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| ScheduleError::TaskNotFound(task_id.to_owned()))?;
        if task.status != TaskStatus::InProgress {
            return Err(ScheduleError::TaskNotInProgress(task_id.to_owned()));
        }
        task.status = TaskStatus::Done;
        task.result = Some(result);
        let expression_id = task.expression_id.clone();
        state.in_progress.remove(task_id);
        TaskCompleted { task_id, result }.log();

        // resolve this task out of its siblings' dependency sets; a task
        // enters the ready queue exactly when its last dependency resolves
        let sibling_ids = state
            .expressions
            .get(&expression_id)
            .map(|expr| expr.task_ids.clone())
            .unwrap_or_default();
        for sibling_id in &sibling_ids {
            if sibling_id == task_id {
                continue;
            }
            let Some(sibling) = state.tasks.get_mut(sibling_id) else {
                continue;
            };
            if sibling.dependencies.remove(task_id)
                && sibling.dependencies.is_empty()
                && sibling.status == TaskStatus::Pending
            {
                // enqueue before flipping status: a failed enqueue leaves the
                // sibling pending, never ready-but-unreachable
                state.ready.push(sibling_id.clone())?;
                sibling.status = TaskStatus::Ready;
            }
        }

        if let Some(expr) = state.expressions.get_mut(&expression_id) {
            let all_done = expr.task_ids.iter().all(|id| {
                state
                    .tasks
                    .get(id)
                    .map_or(false, |t| t.status == TaskStatus::Done)
            });
            if all_done {
                expr.status = ExpressionStatus::Done;
                expr.result = expr
                    .root_task_id()
                    .and_then(|root| state.tasks.get(root))
                    .and_then(|root| root.result);
                ExpressionCompleted {
                    expression_id: &expression_id,
                    result: expr.result.unwrap_or(f64::NAN),
                }
                .log();
            }
        }

        Ok(())
    }

    fn fail(&self, task_id: &str, reason: &str) -> Result<(), ScheduleError> {
        let mut guard = self.state.write().unwrap();
        let state = &mut *guard;

        let task = state
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| ScheduleError::TaskNotFound(task_id.to_owned()))?;
        if task.status != TaskStatus::InProgress {
            return Err(ScheduleError::TaskNotInProgress(task_id.to_owned()));
        }
        task.status = TaskStatus::Error;
        let expression_id = task.expression_id.clone();
        state.in_progress.remove(task_id);

        // dependents keep the dead dependency and never become ready
        if let Some(expr) = state.expressions.get_mut(&expression_id) {
            expr.status = ExpressionStatus::Error;
        }
        ExpressionFailed {
            expression_id: &expression_id,
            task_id,
            reason,
        }
        .log();

        Ok(())
    }

    fn resolve(&self, task: &Task) -> TaskPayload {
        let state = self.state.read().unwrap();
        let resolve_arg = |arg: &ArgSlot| -> f64 {
            match arg {
                ArgSlot::Literal(text) => text.parse().unwrap_or(f64::NAN),
                // an unresolved reference here is a scheduler bug; NaN is
                // the sentinel the wire format reserves for it
                ArgSlot::Ref(id) => state
                    .tasks
                    .get(id)
                    .and_then(|dep| dep.result)
                    .unwrap_or(f64::NAN),
            }
        };
        TaskPayload {
            id: task.id.clone(),
            operation: task.operation.symbol().to_owned(),
            arg1: resolve_arg(&task.arg1),
            arg2: resolve_arg(&task.arg2),
            operation_time: self.operation_times.for_operation(task.operation),
        }
    }

    fn list(&self) -> Vec<ExpressionSummary> {
        let state = self.state.read().unwrap();
        state
            .expressions
            .values()
            .map(|expr| ExpressionSummary {
                id: expr.id.clone(),
                status: expr.status,
                result: expr.result,
            })
            .collect()
    }

    fn get(&self, expression_id: &str) -> Option<ExpressionSummary> {
        let state = self.state.read().unwrap();
        state.expressions.get(expression_id).map(|expr| ExpressionSummary {
            id: expr.id.clone(),
            status: expr.status,
            result: expr.result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::task::Operation;
    use crate::errors::ParseError;

    fn scheduler() -> Scheduler {
        Scheduler::new(OperationTimes::default())
    }

    #[test]
    fn submit_seeds_only_leaf_tasks() {
        let s = scheduler();
        let id = s.submit("(1+2)*(3+4)").unwrap();
        assert_eq!(id, "expr-1");

        let first = s.claim().expect("first add should be ready");
        let second = s.claim().expect("second add should be ready");
        assert_eq!(first.operation, Operation::Add);
        assert_eq!(second.operation, Operation::Add);
        assert!(s.claim().is_none(), "root multiply waits on both adds");
    }

    #[test]
    fn claim_is_fifo_over_enqueue_order() {
        let s = scheduler();
        s.submit("1+2").unwrap();
        s.submit("3+4").unwrap();

        assert_eq!(s.claim().unwrap().id, "task-1");
        assert_eq!(s.claim().unwrap().id, "task-2");
        assert!(s.claim().is_none());
    }

    #[test]
    fn parse_failure_installs_nothing() {
        let s = scheduler();
        let err = s.submit("1+").unwrap_err();
        assert!(matches!(err, ScheduleError::Parse(_)));
        assert!(s.list().is_empty());
        assert!(s.claim().is_none());
    }

    #[test]
    fn precedence_scenario_runs_to_completion() {
        // "2+2*2" → task-1: 2*2, task-2: 2+task-1, result 6
        let s = scheduler();
        let expr_id = s.submit("2+2*2").unwrap();

        let mul = s.claim().unwrap();
        assert_eq!(mul.id, "task-1");
        let payload = s.resolve(&mul);
        assert_eq!(payload.operation, "*");
        assert_eq!((payload.arg1, payload.arg2), (2.0, 2.0));
        assert_eq!(payload.operation_time, 2000);

        s.complete(&mul.id, 4.0).unwrap();

        let add = s.claim().unwrap();
        assert_eq!(add.id, "task-2");
        let payload = s.resolve(&add);
        assert_eq!((payload.arg1, payload.arg2), (2.0, 4.0));

        s.complete(&add.id, 6.0).unwrap();

        let summary = s.get(&expr_id).unwrap();
        assert_eq!(summary.status, ExpressionStatus::Done);
        assert_eq!(summary.result, Some(6.0));
    }

    #[test]
    fn dependents_enter_the_queue_exactly_once() {
        let s = scheduler();
        s.submit("(1+2)*(3+4)").unwrap();

        let a = s.claim().unwrap();
        let b = s.claim().unwrap();
        s.complete(&a.id, 3.0).unwrap();
        assert!(s.claim().is_none(), "root still waits on the second add");
        s.complete(&b.id, 7.0).unwrap();

        let root = s.claim().expect("root ready after last dependency");
        assert_eq!(root.operation, Operation::Mul);
        assert!(s.claim().is_none(), "root was enqueued only once");

        s.complete(&root.id, 21.0).unwrap();
        assert_eq!(s.get("expr-1").unwrap().result, Some(21.0));
    }

    #[test]
    fn completing_an_unknown_task_is_rejected() {
        let s = scheduler();
        assert_eq!(
            s.complete("task-99", 1.0),
            Err(ScheduleError::TaskNotFound("task-99".into()))
        );
    }

    #[test]
    fn completing_a_task_twice_is_rejected() {
        let s = scheduler();
        s.submit("1+1").unwrap();
        let task = s.claim().unwrap();
        s.complete(&task.id, 2.0).unwrap();
        assert_eq!(
            s.complete(&task.id, 2.0),
            Err(ScheduleError::TaskNotInProgress(task.id.clone()))
        );
    }

    #[test]
    fn completing_an_unclaimed_task_is_rejected() {
        let s = scheduler();
        s.submit("1+1").unwrap();
        assert_eq!(
            s.complete("task-1", 2.0),
            Err(ScheduleError::TaskNotInProgress("task-1".into()))
        );
    }

    #[test]
    fn constant_expression_is_done_at_submit() {
        let s = scheduler();
        let id = s.submit("42").unwrap();
        let summary = s.get(&id).unwrap();
        assert_eq!(summary.status, ExpressionStatus::Done);
        assert_eq!(summary.result, Some(42.0));
        assert!(s.claim().is_none());
    }

    #[test]
    fn worker_failure_marks_task_and_expression_error() {
        // "10/(5-5)": the divide resolves to /0 and the worker reports it
        let s = scheduler();
        let expr_id = s.submit("10/(5-5)").unwrap();

        let sub = s.claim().unwrap();
        s.complete(&sub.id, 0.0).unwrap();

        let div = s.claim().unwrap();
        let payload = s.resolve(&div);
        assert_eq!(payload.arg2, 0.0);

        s.fail(&div.id, "division by zero").unwrap();

        let summary = s.get(&expr_id).unwrap();
        assert_eq!(summary.status, ExpressionStatus::Error);
        assert_eq!(summary.result, None);
        assert!(s.claim().is_none());
        assert_eq!(
            s.fail(&div.id, "division by zero"),
            Err(ScheduleError::TaskNotInProgress(div.id.clone()))
        );
    }

    #[test]
    fn non_finite_results_propagate_unchanged() {
        let s = scheduler();
        let expr_id = s.submit("2+2*2").unwrap();
        let mul = s.claim().unwrap();
        s.complete(&mul.id, f64::NAN).unwrap();

        let add = s.claim().unwrap();
        let payload = s.resolve(&add);
        assert!(payload.arg2.is_nan());

        s.complete(&add.id, f64::NAN).unwrap();
        let summary = s.get(&expr_id).unwrap();
        assert_eq!(summary.status, ExpressionStatus::Done);
        assert!(summary.result.unwrap().is_nan());
    }

    #[test]
    fn resolve_substitutes_nan_for_unresolved_reference() {
        let s = scheduler();
        let stray = Task::new(
            "task-9".into(),
            "expr-9".into(),
            Operation::Add,
            ArgSlot::Ref("task-8".into()),
            ArgSlot::Literal("1".into()),
        );
        let payload = s.resolve(&stray);
        assert!(payload.arg1.is_nan());
        assert_eq!(payload.arg2, 1.0);
    }

    #[test]
    fn submission_backpressures_when_the_queue_is_full() {
        let s = Scheduler::with_queue_capacity(OperationTimes::default(), 2);
        let err = s.submit("(1+1)+(2+2)+(3+3)").unwrap_err();
        assert_eq!(err, ScheduleError::ReadyQueueFull);
        assert!(s.list().is_empty(), "no partial expression installed");

        // a narrower expression still fits
        assert!(s.submit("(1+1)+(2+2)").is_ok());
    }

    #[test]
    fn full_queue_during_propagation_leaves_dependent_pending() {
        let s = Scheduler::with_queue_capacity(OperationTimes::default(), 1);
        s.submit("2+2*2").unwrap();
        let mul = s.claim().unwrap();
        // the freed slot is taken by another expression's leaf
        s.submit("1+1").unwrap();

        assert_eq!(s.complete(&mul.id, 4.0), Err(ScheduleError::ReadyQueueFull));

        // the completion itself was recorded
        assert_eq!(
            s.complete(&mul.id, 4.0),
            Err(ScheduleError::TaskNotInProgress(mul.id.clone()))
        );

        // the starved dependent was not marked ready, and the other
        // expression's leaf is still claimable
        let leaf = s.claim().expect("second expression's leaf is claimable");
        assert_eq!(leaf.expression_id, "expr-2");
        assert!(s.claim().is_none());
        assert_eq!(s.get("expr-1").unwrap().status, ExpressionStatus::Pending);
    }

    #[test]
    fn ids_are_monotonic_across_expressions() {
        let s = scheduler();
        assert_eq!(s.submit("1+1").unwrap(), "expr-1");
        assert_eq!(s.submit("2+2").unwrap(), "expr-2");
        assert_eq!(s.claim().unwrap().id, "task-1");
        assert_eq!(s.claim().unwrap().id, "task-2");
    }

    #[test]
    fn list_snapshots_all_expressions() {
        let s = scheduler();
        s.submit("1+1").unwrap();
        s.submit("7").unwrap();

        let mut summaries = s.list();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].status, ExpressionStatus::Pending);
        assert_eq!(summaries[1].status, ExpressionStatus::Done);
        assert!(s.get("expr-404").is_none());
    }

    #[test]
    fn validator_and_lexer_reject_the_same_inputs_differently() {
        let s = scheduler();
        // precise lexer diagnostics surface through submit
        assert_eq!(
            s.submit("1+x"),
            Err(ScheduleError::Parse(ParseError::InvalidCharacter {
                ch: 'x',
                offset: 2
            }))
        );
    }
}
