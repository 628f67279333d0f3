//! Basic Blocks
//!
//! A basic block is a label plus a straight-line statement list. Every block
//! except the last one of a body ends with a control transfer; blocks never
//! fall through into each other.

use super::instr::Stmt;
use serde::{Deserialize, Serialize};

/// A labeled basic block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicBlock {
    /// Unique label (jump target)
    pub label: String,
    /// Statements in order, including the final control transfer
    pub stmts: Vec<Stmt>,
}

impl BasicBlock {
    /// Create a new empty block
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            stmts: Vec::new(),
        }
    }

    /// Append a statement
    pub fn push(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    /// The final statement, if it transfers control
    pub fn terminator(&self) -> Option<&Stmt> {
        self.stmts.last().filter(|s| s.is_control_transfer())
    }

    /// Check if this block ends with a control transfer
    pub fn is_terminated(&self) -> bool {
        self.terminator().is_some()
    }

    /// Get the number of statements
    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    /// Check if this block has no statements
    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}
