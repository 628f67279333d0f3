//! IR Values
//!
//! Simple values: the only operands an IR expression or statement may have.

use crate::ast::Literal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

/// A simple value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Value {
    /// Source-level integer, kept at full precision
    Num {
        #[serde(with = "crate::ast::bigint_text")]
        value: BigInt,
    },
    /// Boolean constant
    Bool { value: bool },
    /// The none value
    None,
    /// Raw machine integer (word offsets, allocation sizes)
    MachineInt { value: u32 },
    /// Variable reference
    Id { name: String },
}

impl Value {
    /// Create a variable reference
    pub fn id(name: impl Into<String>) -> Self {
        Value::Id { name: name.into() }
    }

    /// Create a source-level integer
    pub fn num(value: impl Into<BigInt>) -> Self {
        Value::Num {
            value: value.into(),
        }
    }

    /// Create a raw machine integer
    pub fn machine_int(value: u32) -> Self {
        Value::MachineInt { value }
    }

    /// Variable name if this is a reference
    pub fn as_id(&self) -> Option<&str> {
        match self {
            Value::Id { name } => Some(name),
            _ => None,
        }
    }

    /// Raw integer if this is a machine integer
    pub fn as_machine_int(&self) -> Option<u32> {
        match self {
            Value::MachineInt { value } => Some(*value),
            _ => None,
        }
    }
}

impl From<&Literal> for Value {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Num { value } => Value::Num {
                value: value.clone(),
            },
            Literal::Bool { value } => Value::Bool { value: *value },
            Literal::None => Value::None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Num { value } => write!(f, "{}", value),
            Value::Bool { value } => write!(f, "{}", value),
            Value::None => write!(f, "none"),
            Value::MachineInt { value } => write!(f, "#{}", value),
            Value::Id { name } => write!(f, "{}", name),
        }
    }
}
