//! Subcommand implementations

pub mod layout;
pub mod lower;

use anyhow::Context;
use cobra_lower::ast::Program;
use std::path::Path;

/// Read a typed program tree from a JSON file
pub fn read_program(path: &Path) -> anyhow::Result<Program> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&source)
        .with_context(|| format!("Failed to parse program tree in {}", path.display()))
}
