//! Field and list element addressing
//!
//! Field accesses resolve to a fixed word offset from the class layout. List
//! elements sit one word past their index because offset 0 holds the length,
//! and every element access is guarded by a bounds check.

use super::{runtime_call, Flattened, Lowerer, Prelude};
use crate::ast;
use crate::error::{LowerError, LowerResult};
use crate::ir::{Expr, Stmt, Value};
use crate::layout::{FieldSlot, FieldTable};

/// Static class of a receiver
pub(super) fn class_name<'e>(obj: &'e ast::Expr, context: &'static str) -> LowerResult<&'e str> {
    obj.ty().class_name().ok_or_else(|| LowerError::NotAClass {
        context,
        found: obj.ty().clone(),
        loc: obj.loc(),
    })
}

/// Require a list-typed receiver
pub(super) fn expect_list(obj: &ast::Expr, context: &'static str) -> LowerResult<()> {
    if obj.ty().is_list() {
        Ok(())
    } else {
        Err(LowerError::NotAList {
            context,
            found: obj.ty().clone(),
            loc: obj.loc(),
        })
    }
}

impl<'a> Lowerer<'a> {
    pub(super) fn class_fields_named(
        &self,
        class: &str,
        loc: ast::SourceLocation,
    ) -> LowerResult<&'a FieldTable> {
        let layout = self.layout;
        layout
            .class_fields(class)
            .ok_or_else(|| LowerError::UnknownClass {
                class: class.to_string(),
                loc,
            })
    }

    /// Slot of `field` in the static class of `obj`
    pub(super) fn field_slot(
        &self,
        obj: &ast::Expr,
        field: &str,
        context: &'static str,
    ) -> LowerResult<&'a FieldSlot> {
        let class = class_name(obj, context)?;
        let fields = self.class_fields_named(class, obj.loc())?;
        fields.get(field).ok_or_else(|| LowerError::UnknownField {
            class: class.to_string(),
            field: field.to_string(),
            loc: obj.loc(),
        })
    }

    /// Word offset of element `index` in `list`, with the bounds check that guards it
    ///
    /// Loads the length header, checks `(length, index)`, then computes
    /// `index + 1`. The check sees the index before the header adjustment.
    pub fn list_index_offset(&mut self, index: &Value, list: &Value) -> Flattened<Value> {
        let mut prelude = Prelude::default();
        let offset = self.emit_list_index_offset(index, list, &mut prelude);
        prelude.finish(offset)
    }

    pub(super) fn emit_list_index_offset(
        &mut self,
        index: &Value,
        list: &Value,
        p: &mut Prelude,
    ) -> Value {
        let length = self.names.fresh("listlength");
        p.declare(&length, ast::Type::Number);
        p.emit(Stmt::Assign {
            name: length.clone(),
            value: Expr::Load {
                start: list.clone(),
                offset: Value::machine_int(0),
            },
        });
        p.emit(runtime_call(
            self.config.index_out_of_bounds.as_str(),
            vec![Value::id(length), index.clone()],
        ));

        let offset = self.names.fresh("offsetname");
        p.declare(&offset, ast::Type::Number);
        p.emit(Stmt::Assign {
            name: offset.clone(),
            value: Expr::BinOp {
                op: ast::BinOp::Plus,
                left: index.clone(),
                right: Value::machine_int(1),
            },
        });
        Value::id(offset)
    }
}
