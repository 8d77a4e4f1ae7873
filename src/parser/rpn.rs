use crate::errors::ParseError;

use super::token::{Token, TokenKind};

/// Convert an infix token stream to reverse Polish notation.
///
/// Standard shunting-yard with left-associative `{+,-} < {*,/}` precedence.
/// Unary-tagged operators are pushed straight onto the operator stack
/// without popping, which makes them bind tighter than any binary operator
/// and right-associative among themselves.
pub fn to_rpn(tokens: Vec<Token>) -> Result<Vec<Token>, ParseError> {
    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Token> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Number => output.push(token),
            TokenKind::Operator => {
                if token.unary {
                    operators.push(token);
                    continue;
                }
                while let Some(top) = operators.last() {
                    if top.kind == TokenKind::Operator
                        && precedence(top.op_char()) >= precedence(token.op_char())
                    {
                        output.push(operators.pop().unwrap());
                    } else {
                        break;
                    }
                }
                operators.push(token);
            }
            TokenKind::LeftParen => operators.push(token),
            TokenKind::RightParen => {
                let mut matched = false;
                while let Some(top) = operators.pop() {
                    if top.kind == TokenKind::LeftParen {
                        matched = true;
                        break;
                    }
                    output.push(top);
                }
                if !matched {
                    return Err(ParseError::MismatchedParens);
                }
            }
        }
    }

    while let Some(top) = operators.pop() {
        if top.kind == TokenKind::LeftParen || top.kind == TokenKind::RightParen {
            return Err(ParseError::MismatchedParens);
        }
        output.push(top);
    }

    Ok(output)
}

fn precedence(op: char) -> u8 {
    match op {
        '+' | '-' => 1,
        '*' | '/' => 2,
        _ => 0,
    }
}
