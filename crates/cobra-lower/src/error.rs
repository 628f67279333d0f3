//! Lowering errors
//!
//! Every variant here is a compiler-internal fault: the type checker handed
//! over a tree that breaks its contract. Runtime failures (none receivers,
//! out-of-bounds indices) are never reported here; the lowering only emits the
//! calls that check for them.

use crate::ast::{SourceLocation, Type};
use thiserror::Error;

pub type LowerResult<T> = Result<T, LowerError>;

#[derive(Debug, Error)]
pub enum LowerError {
    #[error("Internal compiler error at {loc}: {context} on non-class type {found}")]
    NotAClass {
        context: &'static str,
        found: Type,
        loc: SourceLocation,
    },

    #[error("Internal compiler error at {loc}: {context} on non-list type {found}")]
    NotAList {
        context: &'static str,
        found: Type,
        loc: SourceLocation,
    },

    #[error("Internal compiler error at {loc}: no layout for class {class}")]
    UnknownClass { class: String, loc: SourceLocation },

    #[error("Internal compiler error at {loc}: class {class} has no field {field}")]
    UnknownField {
        class: String,
        field: String,
        loc: SourceLocation,
    },

    #[error("Lowered IR failed validation: {}", .errors.join("; "))]
    InvalidIr { errors: Vec<String> },
}

impl LowerError {
    /// Source location of the offending node, if the error concerns one
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            LowerError::NotAClass { loc, .. }
            | LowerError::NotAList { loc, .. }
            | LowerError::UnknownClass { loc, .. }
            | LowerError::UnknownField { loc, .. } => Some(*loc),
            LowerError::InvalidIr { .. } => None,
        }
    }
}
