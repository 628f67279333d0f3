//! `cobra lower` - Lower a typed program tree to IR.

use super::read_program;
use crate::OutputFormat;
use anyhow::Context;
use cobra_lower::ir::PrettyPrint;
use cobra_lower::{LayoutTable, LowerConfig, Lowerer};
use std::path::PathBuf;
use tracing::info;

pub struct LowerArgs {
    pub file: PathBuf,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub validate: bool,
}

pub fn execute(args: LowerArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => LowerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => LowerConfig::default(),
    };
    config.validate |= args.validate;

    let program = read_program(&args.file)?;
    let layout = LayoutTable::from_classes(&program.classes);
    let mut lowerer = Lowerer::new(&layout, &config);
    let lowered = lowerer
        .lower_program(&program)
        .with_context(|| format!("Failed to lower {}", args.file.display()))?;

    info!(
        functions = lowered.funs.len(),
        classes = lowered.classes.len(),
        blocks = lowered.all_blocks().count(),
        "lowered {}",
        args.file.display()
    );

    let text = match args.format {
        OutputFormat::Pretty => lowered.pretty_print(),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&lowered)?;
            json.push('\n');
            json
        }
    };

    match &args.output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", text),
    }
    Ok(())
}
