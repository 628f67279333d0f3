//! `cobra layout` - Print class field layouts.

use super::read_program;
use cobra_lower::LayoutTable;
use std::path::Path;

pub fn execute(file: &Path) -> anyhow::Result<()> {
    let program = read_program(file)?;
    let layout = LayoutTable::from_classes(&program.classes);

    for (class, fields) in layout.sorted() {
        println!("class {} ({} words)", class, fields.len());
        for (name, slot) in fields {
            println!("  {:>3}  {} = {}", slot.offset, name, slot.default);
        }
    }
    Ok(())
}
