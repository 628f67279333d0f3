//! IR Programs
//!
//! Functions, classes and the top-level body after lowering.

use super::block::BasicBlock;
use super::value::Value;
use crate::ast::{Parameter, Type};
use serde::{Deserialize, Serialize};

/// Variable with storage; declared locals and lowering temporaries alike
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarInit {
    pub name: String,
    pub ty: Type,
    pub value: Value,
}

impl VarInit {
    /// A variable initialized to the none placeholder
    pub fn placeholder(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            value: Value::None,
        }
    }
}

/// A lowered function or method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunDef {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub ret: Type,
    /// Temporaries introduced while lowering, followed by declared locals
    pub inits: Vec<VarInit>,
    pub body: Vec<BasicBlock>,
}

/// A lowered class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    pub fields: Vec<VarInit>,
    pub methods: Vec<FunDef>,
}

/// A lowered program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub funs: Vec<FunDef>,
    /// Temporaries of the top-level body, followed by declared globals
    pub inits: Vec<VarInit>,
    pub classes: Vec<Class>,
    /// Top-level statements
    pub body: Vec<BasicBlock>,
}

impl Program {
    /// Get a function by name
    pub fn get_function(&self, name: &str) -> Option<&FunDef> {
        self.funs.iter().find(|f| f.name == name)
    }

    /// Get a class by name
    pub fn get_class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Every block body in the program: top level, functions, then methods
    pub fn bodies(&self) -> Vec<(String, &[BasicBlock])> {
        let mut bodies: Vec<(String, &[BasicBlock])> =
            vec![("<top>".to_string(), self.body.as_slice())];
        for fun in &self.funs {
            bodies.push((fun.name.clone(), fun.body.as_slice()));
        }
        for class in &self.classes {
            for method in &class.methods {
                bodies.push((
                    format!("{}.{}", class.name, method.name),
                    method.body.as_slice(),
                ));
            }
        }
        bodies
    }

    /// Iterate over every block in the program
    pub fn all_blocks(&self) -> impl Iterator<Item = &BasicBlock> {
        let methods = self.classes.iter().flat_map(|c| c.methods.iter());
        self.body.iter().chain(
            self.funs
                .iter()
                .chain(methods)
                .flat_map(|f| f.body.iter()),
        )
    }

    /// Validate every body in the program
    pub fn validate(&self) -> Result<(), Vec<String>> {
        super::validate::validate_program(self)
    }
}
