//! Structural validation of lowered bodies
//!
//! Checks the block-termination and labeling rules the code generator relies
//! on. A `return` may be followed by more statements (the join jump of an
//! enclosing `if`, or unreachable code); jumps may not.

use super::block::BasicBlock;
use super::program::Program;
use rustc_hash::FxHashSet;

/// Validate one body (the blocks of a function or of the top level)
pub fn validate_blocks(blocks: &[BasicBlock]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if blocks.is_empty() {
        errors.push("Body has no blocks".to_string());
        return Err(errors);
    }

    let mut labels = FxHashSet::default();
    for block in blocks {
        if !labels.insert(block.label.as_str()) {
            errors.push(format!("Duplicate block label {}", block.label));
        }
    }

    let last = blocks.len() - 1;
    for (i, block) in blocks.iter().enumerate() {
        if i != last && !block.is_terminated() {
            errors.push(format!("Block {} is not terminated", block.label));
        }

        let body_len = block.stmts.len();
        for (pos, stmt) in block.stmts.iter().enumerate() {
            let targets = stmt.jump_targets();
            if !targets.is_empty() && pos + 1 != body_len {
                errors.push(format!(
                    "Block {} has a jump before its final statement ({})",
                    block.label, stmt
                ));
            }
            for target in targets {
                if !labels.contains(target) {
                    errors.push(format!(
                        "Block {} references non-existent block {}",
                        block.label, target
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate every body of a program, plus program-wide label uniqueness
pub fn validate_program(program: &Program) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut seen = FxHashSet::default();

    for (name, blocks) in program.bodies() {
        if let Err(errs) = validate_blocks(blocks) {
            errors.extend(errs.into_iter().map(|e| format!("{}: {}", name, e)));
        }
        for block in blocks {
            if !seen.insert(block.label.as_str()) {
                errors.push(format!(
                    "{}: label {} is already used by another body",
                    name, block.label
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
