//! IR Statements and Expressions
//!
//! Each expression applies at most one operator, and every operand is a
//! [`Value`].

use super::value::Value;
use crate::ast::{BinOp, UniOp};
use serde::{Deserialize, Serialize};

/// Flat expressions (right-hand side of an assignment)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Expr {
    /// A bare value
    Value { value: Value },
    UniOp { op: UniOp, expr: Value },
    BinOp { op: BinOp, left: Value, right: Value },
    Builtin1 { name: String, arg: Value },
    Builtin2 { name: String, left: Value, right: Value },
    /// Direct call to a named function
    Call { name: String, arguments: Vec<Value> },
    /// Read the word at `start + offset`
    Load { start: Value, offset: Value },
    /// Allocate `amount` words, yielding a reference
    Alloc { amount: Value },
}

impl Expr {
    /// Wrap a value
    pub fn value(value: Value) -> Self {
        Expr::Value { value }
    }

    /// All operands, in evaluation order
    pub fn operands(&self) -> Vec<&Value> {
        match self {
            Expr::Value { value } => vec![value],
            Expr::UniOp { expr, .. } => vec![expr],
            Expr::BinOp { left, right, .. } | Expr::Builtin2 { left, right, .. } => {
                vec![left, right]
            }
            Expr::Builtin1 { arg, .. } => vec![arg],
            Expr::Call { arguments, .. } => arguments.iter().collect(),
            Expr::Load { start, offset } => vec![start, offset],
            Expr::Alloc { amount } => vec![amount],
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Value { value } => write!(f, "{}", value),
            Expr::UniOp { op, expr } => write!(f, "{}{}", op, expr),
            Expr::BinOp { op, left, right } => write!(f, "{} {} {}", left, op, right),
            Expr::Builtin1 { name, arg } => write!(f, "builtin {}({})", name, arg),
            Expr::Builtin2 { name, left, right } => {
                write!(f, "builtin {}({}, {})", name, left, right)
            }
            Expr::Call { name, arguments } => {
                let args: Vec<String> = arguments.iter().map(|a| a.to_string()).collect();
                write!(f, "call {}({})", name, args.join(", "))
            }
            Expr::Load { start, offset } => write!(f, "load {}[{}]", start, offset),
            Expr::Alloc { amount } => write!(f, "alloc {}", amount),
        }
    }
}

/// Statements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Stmt {
    /// `name = value`
    Assign { name: String, value: Expr },
    /// Return from the enclosing function
    Return { value: Value },
    /// Evaluate for side effects
    Expr { expr: Expr },
    /// Write `value` to the word at `start + offset`
    Store {
        start: Value,
        offset: Value,
        value: Value,
    },
    /// Unconditional jump
    Jmp { lbl: String },
    /// Conditional jump
    IfJmp { cond: Value, thn: String, els: String },
}

impl Stmt {
    /// Check if this statement transfers control out of its block
    pub fn is_control_transfer(&self) -> bool {
        matches!(
            self,
            Stmt::Jmp { .. } | Stmt::IfJmp { .. } | Stmt::Return { .. }
        )
    }

    /// Labels this statement may jump to
    pub fn jump_targets(&self) -> Vec<&str> {
        match self {
            Stmt::Jmp { lbl } => vec![lbl],
            Stmt::IfJmp { thn, els, .. } => vec![thn, els],
            _ => vec![],
        }
    }
}

impl std::fmt::Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Assign { name, value } => write!(f, "{} = {}", name, value),
            Stmt::Return { value } => write!(f, "return {}", value),
            Stmt::Expr { expr } => write!(f, "{}", expr),
            Stmt::Store {
                start,
                offset,
                value,
            } => write!(f, "store {}[{}] = {}", start, offset, value),
            Stmt::Jmp { lbl } => write!(f, "jmp {}", lbl),
            Stmt::IfJmp { cond, thn, els } => write!(f, "ifjmp {} ? {} : {}", cond, thn, els),
        }
    }
}
