//! Postfix token stream → task DAG.
//!
//! Walks the RPN stream with an argument stack whose slots are either
//! literals or task ids. Every binary operator becomes a task; emission
//! order is a valid topological order of the dependency graph, so the last
//! emitted task is the expression's root.

use crate::errors::ParseError;
use crate::parser::{Token, TokenKind};

use super::task::{ArgSlot, Operation, Task};

/// Outcome of building a DAG from a postfix stream.
///
/// An expression that reduces to a bare literal (a plain number, possibly
/// behind unary plus) produces no tasks; it is complete the moment it is
/// submitted.
#[derive(Debug, Clone, PartialEq)]
pub enum DagPlan {
    Tasks(Vec<Task>),
    Constant(f64),
}

/// Build the task list for one expression from its RPN token stream.
///
/// `next_task_id` allocates process-unique task ids; unary minus is
/// synthesized as `0 - x`, unary plus forwards its operand unchanged.
pub fn build_dag(
    rpn: &[Token],
    expression_id: &str,
    next_task_id: &mut dyn FnMut() -> String,
) -> Result<DagPlan, ParseError> {
    let mut stack: Vec<ArgSlot> = Vec::new();
    let mut tasks: Vec<Task> = Vec::new();

    for token in rpn {
        match token.kind {
            TokenKind::Number => stack.push(ArgSlot::from_text(token.lexeme.clone())),
            TokenKind::Operator if token.unary => {
                let op = token.op_char();
                let arg = stack.pop().ok_or(ParseError::MissingOperand { op })?;
                if op == '+' {
                    stack.push(arg);
                    continue;
                }
                let task = Task::new(
                    next_task_id(),
                    expression_id.to_owned(),
                    Operation::Sub,
                    ArgSlot::Literal("0".into()),
                    arg,
                );
                stack.push(ArgSlot::Ref(task.id.clone()));
                tasks.push(task);
            }
            TokenKind::Operator => {
                let op = token.op_char();
                let operation =
                    Operation::from_char(op).ok_or(ParseError::MissingOperand { op })?;
                let arg2 = stack.pop().ok_or(ParseError::MissingOperand { op })?;
                let arg1 = stack.pop().ok_or(ParseError::MissingOperand { op })?;
                let task = Task::new(
                    next_task_id(),
                    expression_id.to_owned(),
                    operation,
                    arg1,
                    arg2,
                );
                stack.push(ArgSlot::Ref(task.id.clone()));
                tasks.push(task);
            }
            TokenKind::LeftParen | TokenKind::RightParen => {
                return Err(ParseError::MismatchedParens)
            }
        }
    }

    if stack.is_empty() {
        return Err(ParseError::Empty);
    }
    if stack.len() > 1 {
        return Err(ParseError::UnreducedOperands);
    }

    match stack.pop().unwrap() {
        ArgSlot::Literal(text) => {
            debug_assert!(tasks.is_empty());
            let value = text.parse().map_err(|_| ParseError::UnreducedOperands)?;
            Ok(DagPlan::Constant(value))
        }
        ArgSlot::Ref(_) => Ok(DagPlan::Tasks(tasks)),
    }
}
