//! Cobra Lowering - typed AST to basic-block IR
//!
//! This crate implements the lowering stage of the Cobra compiler. It takes a
//! fully type-checked program tree and produces a flat IR made of labeled basic
//! blocks with explicit jumps, ready for the code generator.
//!
//! # Structure
//!
//! - [`ast`] - The annotated input tree produced by the type checker
//! - [`config`] - Runtime helper names, mangling and validation switches
//! - [`error`] - Lowering error type
//! - [`ir`] - Basic blocks, flat statements and simple values
//! - [`layout`] - Class field offsets and defaults
//! - [`lower`] - Expression flattening, CFG construction and the program driver

pub mod ast;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod lower;

pub use config::{ConfigError, LowerConfig};
pub use error::{LowerError, LowerResult};
pub use layout::{ClassLayout, FieldSlot, FieldTable, LayoutTable};
pub use lower::{BlockArena, Flattened, Lowerer, NameGenerator};

/// Lower a program with a layout table computed from its own class declarations
pub fn lower_program(program: &ast::Program, config: &LowerConfig) -> LowerResult<ir::Program> {
    let layout = LayoutTable::from_classes(&program.classes);
    let mut lowerer = Lowerer::new(&layout, config);
    lowerer.lower_program(program)
}
