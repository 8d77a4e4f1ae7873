// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors produced while turning expression text into a task DAG.
///
/// The structural validator reports the coarse variants (`Empty`,
/// `UnbalancedParen`, `TrailingOperator`); the lexer and the RPN/DAG stages
/// report the precise ones. Offsets are byte positions into the submitted
/// expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("expression cannot be empty")]
    Empty,

    #[error("invalid character '{ch}' at position {offset}")]
    InvalidCharacter { ch: char, offset: usize },

    #[error("invalid number format at position {offset}")]
    InvalidNumber { offset: usize },

    #[error("unary operator '{op}' must be directly before its operand, without spaces")]
    DanglingUnary { op: char },

    #[error("operators '{first}' and '{second}' cannot be adjacent at position {offset}")]
    AdjacentOperators {
        first: char,
        second: char,
        offset: usize,
    },

    #[error("expression cannot end with operator '{op}'")]
    TrailingOperator { op: char },

    #[error("unbalanced parentheses at position {offset}")]
    UnbalancedParen { offset: usize },

    #[error("unbalanced parentheses: {missing} closing parentheses are missing")]
    UnclosedParens { missing: usize },

    #[error("mismatched parentheses")]
    MismatchedParens,

    #[error("operator '{op}' is missing an operand")]
    MissingOperand { op: char },

    #[error("expression does not reduce to a single value")]
    UnreducedOperands,
}
