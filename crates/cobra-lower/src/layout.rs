//! Class layout service
//!
//! Maps a class name to its ordered field table: for every field, the word
//! offset from the start of an allocated object and the value a freshly
//! constructed object holds there. Lists are a separate layout family (length
//! header at offset 0, elements after it) and never appear here.

use crate::ast;
use crate::ir::Value;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Storage slot of one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSlot {
    /// Words from the start of the object
    pub offset: u32,
    /// Value stored by construction
    pub default: Value,
}

/// Ordered mapping from field name to slot
pub type FieldTable = IndexMap<String, FieldSlot>;

/// Source of class field tables consulted during lowering
pub trait ClassLayout {
    /// Field table of `class`, or `None` if the class is unknown
    fn class_fields(&self, class: &str) -> Option<&FieldTable>;
}

/// Field tables for a set of classes
#[derive(Debug, Clone, Default, Serialize)]
pub struct LayoutTable {
    classes: FxHashMap<String, FieldTable>,
}

impl LayoutTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out classes with fields packed in declaration order, one word each
    pub fn from_classes(classes: &[ast::Class]) -> Self {
        let mut table = Self::new();
        for class in classes {
            let fields = class
                .fields
                .iter()
                .enumerate()
                .map(|(index, field)| {
                    let slot = FieldSlot {
                        offset: index as u32,
                        default: Value::from(&field.value),
                    };
                    (field.name.clone(), slot)
                })
                .collect();
            table.insert_class(class.name.clone(), fields);
        }
        table
    }

    /// Register (or replace) the field table of a class
    pub fn insert_class(&mut self, name: impl Into<String>, fields: FieldTable) {
        self.classes.insert(name.into(), fields);
    }

    /// Iterate over classes sorted by name
    pub fn sorted(&self) -> Vec<(&str, &FieldTable)> {
        let mut entries: Vec<_> = self
            .classes
            .iter()
            .map(|(name, fields)| (name.as_str(), fields))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl ClassLayout for LayoutTable {
    fn class_fields(&self, class: &str) -> Option<&FieldTable> {
        self.classes.get(class)
    }
}
