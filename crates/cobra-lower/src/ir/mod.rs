//! Intermediate Representation (IR) for Cobra
//!
//! The IR sits between the typed AST and code generation. Every body is a
//! flat, ordered list of labeled basic blocks; every operand is a simple
//! [`Value`], so nested expressions cannot be represented at all.
//!
//! # Structure
//!
//! - `Program` - Top-level functions, classes, variables and body blocks
//! - `FunDef` - A function with its merged variable list and basic blocks
//! - `BasicBlock` - A label plus a straight-line statement list
//! - `Stmt` / `Expr` - Single-operator statements over simple values
//! - `Value` - Literals, raw machine integers and variable references

pub mod block;
pub mod instr;
pub mod pretty;
pub mod program;
pub mod validate;
pub mod value;

pub use block::BasicBlock;
pub use instr::{Expr, Stmt};
pub use pretty::PrettyPrint;
pub use program::{Class, FunDef, Program, VarInit};
pub use validate::validate_blocks;
pub use value::Value;
