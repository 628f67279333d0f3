//! Basic block arena
//!
//! Blocks of the body being lowered, in opening order. Statements are
//! always appended to the most recently opened block; `if` and `while` open
//! new blocks at their fork and join points.

use crate::ir::{BasicBlock, Stmt};
use tracing::trace;

/// Ordered, append-only list of blocks
#[derive(Debug)]
pub struct BlockArena {
    /// Blocks closed by opening a later one
    finished: Vec<BasicBlock>,
    /// Block receiving new statements
    current: BasicBlock,
}

impl BlockArena {
    /// Create an arena holding just the entry block
    pub fn new(entry_label: impl Into<String>) -> Self {
        Self {
            finished: Vec::new(),
            current: BasicBlock::new(entry_label),
        }
    }

    /// Open a new block; later statements go there
    pub fn push_block(&mut self, label: impl Into<String>) {
        let label = label.into();
        trace!(%label, opened = self.finished.len() + 1, "open block");
        let previous = std::mem::replace(&mut self.current, BasicBlock::new(label));
        self.finished.push(previous);
    }

    /// Append a statement to the current block
    pub fn emit(&mut self, stmt: Stmt) {
        self.current.push(stmt);
    }

    /// Append statements to the current block, in order
    pub fn emit_all(&mut self, stmts: impl IntoIterator<Item = Stmt>) {
        self.current.stmts.extend(stmts);
    }

    /// Take the blocks out, in the order they were opened
    pub fn into_blocks(self) -> Vec<BasicBlock> {
        let mut blocks = self.finished;
        blocks.push(self.current);
        blocks
    }
}
