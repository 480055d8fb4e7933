//! Arithmetic s-expressions such as `(+ (* 10 2) (- (/ 50 3) 2))`.
//!
//! Each operation is written `(op left right)` with `op` one of
//! `+ - * /`; operands are unsigned decimal numbers or further
//! operations.  Operands are separated by spaces.
use std::error::Error;
use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use base::prelude::*;

use super::{number, MAX_NESTING};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Expr {
    Number(i64),
    Operation {
        operator: Operator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Operation {
                operator,
                left,
                right,
            } => write!(f, "({operator} {left} {right})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    DivisionByZero,
    Overflow(Operator),
}

impl Display for EvalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::DivisionByZero => f.write_str("division by zero"),
            EvalError::Overflow(op) => write!(f, "arithmetic overflow in ({op} ...)"),
        }
    }
}

impl Error for EvalError {}

/// Evaluates an expression using (truncating) integer arithmetic.
///
/// # Errors
///
/// Fails on division by zero, or if any intermediate result does not
/// fit in an `i64`.
pub fn evaluate(expr: &Expr) -> Result<i64, EvalError> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Operation {
            operator,
            left,
            right,
        } => {
            let a = evaluate(left)?;
            let b = evaluate(right)?;
            let value = match operator {
                Operator::Add => a.checked_add(b),
                Operator::Subtract => a.checked_sub(b),
                Operator::Multiply => a.checked_mul(b),
                Operator::Divide if b == 0 => return Err(EvalError::DivisionByZero),
                Operator::Divide => a.checked_div(b),
            };
            value.ok_or(EvalError::Overflow(*operator))
        }
    }
}

fn operator() -> Parser<str, Operator> {
    choice(
        [
            Operator::Add,
            Operator::Subtract,
            Operator::Multiply,
            Operator::Divide,
        ]
        .into_iter()
        .map(|op| literal(op.symbol()).map(move |_| op))
        .collect(),
    )
    .error_map(|_, index| format!("operator: expected one of + - * / @ index {index}"))
}

fn whitespace() -> Parser<str, ()> {
    many_one(literal(" ")).map(|_| ())
}

fn operation(operand: Parser<str, Expr>) -> Parser<str, Expr> {
    let body = operator()
        .then(whitespace())
        .then(operand.clone())
        .then(whitespace())
        .then(operand)
        .map(|((((operator, ()), left), ()), right)| Expr::Operation {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        });
    between(literal("("), literal(")"))(body)
}

/// Parses a number or a parenthesised operation.  Operations may
/// be nested up to [`MAX_NESTING`] deep, counting the numbers at the
/// bottom as a level.
#[must_use]
pub fn expression() -> Parser<str, Expr> {
    recursive(MAX_NESTING, |expression: Parser<str, Expr>| {
        choice(vec![number::<i64>().map(Expr::Number), operation(expression)])
    })
}
