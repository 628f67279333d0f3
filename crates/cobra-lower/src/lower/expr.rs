//! Expression Lowering
//!
//! Flattens nested AST expressions into statements over simple values.
//! Sub-operands are always flattened left to right, and a temporary is only
//! introduced when a composite result has to be used as an operand.

use super::access::{class_name, expect_list};
use super::{runtime_call, Flattened, Lowerer, Prelude};
use crate::ast;
use crate::error::LowerResult;
use crate::ir::{Expr, Stmt, Value};

impl<'a> Lowerer<'a> {
    /// Flatten an expression down to one operator over simple values
    pub fn flatten_expr_to_expr(&mut self, expr: &ast::Expr) -> LowerResult<Flattened<Expr>> {
        let mut prelude = Prelude::default();
        let flat = self.expr_to_expr(expr, &mut prelude)?;
        Ok(prelude.finish(flat))
    }

    /// Flatten an expression down to a simple value
    pub fn flatten_expr_to_val(&mut self, expr: &ast::Expr) -> LowerResult<Flattened<Value>> {
        let mut prelude = Prelude::default();
        let value = self.expr_to_val(expr, &mut prelude)?;
        Ok(prelude.finish(value))
    }

    pub(super) fn expr_to_val(&mut self, expr: &ast::Expr, p: &mut Prelude) -> LowerResult<Value> {
        match self.expr_to_expr(expr, p)? {
            Expr::Value { value } => Ok(value),
            flat => {
                let name = self.names.fresh("valname");
                p.declare(&name, expr.ty().clone());
                p.emit(Stmt::Assign {
                    name: name.clone(),
                    value: flat,
                });
                Ok(Value::Id { name })
            }
        }
    }

    fn exprs_to_vals(&mut self, exprs: &[ast::Expr], p: &mut Prelude) -> LowerResult<Vec<Value>> {
        exprs.iter().map(|e| self.expr_to_val(e, p)).collect()
    }

    pub(super) fn expr_to_expr(&mut self, expr: &ast::Expr, p: &mut Prelude) -> LowerResult<Expr> {
        match expr {
            ast::Expr::UniOp { op, expr, .. } => {
                let value = self.expr_to_val(expr, p)?;
                Ok(Expr::UniOp {
                    op: *op,
                    expr: value,
                })
            }

            ast::Expr::BinOp {
                op, left, right, ..
            } => {
                let left = self.expr_to_val(left, p)?;
                let right = self.expr_to_val(right, p)?;
                Ok(Expr::BinOp {
                    op: *op,
                    left,
                    right,
                })
            }

            ast::Expr::Builtin1 { name, arg, .. } => {
                let arg = self.expr_to_val(arg, p)?;
                Ok(Expr::Builtin1 {
                    name: name.clone(),
                    arg,
                })
            }

            ast::Expr::Builtin2 {
                name, left, right, ..
            } => {
                let left = self.expr_to_val(left, p)?;
                let right = self.expr_to_val(right, p)?;
                Ok(Expr::Builtin2 {
                    name: name.clone(),
                    left,
                    right,
                })
            }

            ast::Expr::Call {
                name, arguments, ..
            } => {
                let arguments = self.exprs_to_vals(arguments, p)?;
                Ok(Expr::Call {
                    name: name.clone(),
                    arguments,
                })
            }

            ast::Expr::MethodCall {
                obj,
                method,
                arguments,
                ..
            } => self.lower_method_call(obj, method, arguments, p),

            ast::Expr::Lookup { obj, field, .. } => {
                let slot = self.field_slot(obj, field, "field lookup")?;
                let start = self.expr_to_val(obj, p)?;
                Ok(Expr::Load {
                    start,
                    offset: Value::machine_int(slot.offset),
                })
            }

            ast::Expr::Index { obj, index, .. } => {
                expect_list(obj, "index")?;
                let start = self.expr_to_val(obj, p)?;
                let index = self.expr_to_val(index, p)?;
                let offset = self.emit_list_index_offset(&index, &start, p);
                Ok(Expr::Load { start, offset })
            }

            ast::Expr::Construct { a, name } => self.lower_construct(a, name, p),

            ast::Expr::ListLiteral { a, elements } => self.lower_list_literal(a, elements, p),

            ast::Expr::Id { name, .. } => Ok(Expr::value(Value::id(name.clone()))),

            ast::Expr::Literal { value, .. } => Ok(Expr::value(Value::from(value))),
        }
    }

    /// `obj.method(args)` becomes a not-none check on the receiver followed by
    /// a direct call to the mangled method with the receiver as first argument
    fn lower_method_call(
        &mut self,
        obj: &ast::Expr,
        method: &str,
        arguments: &[ast::Expr],
        p: &mut Prelude,
    ) -> LowerResult<Expr> {
        let config = self.config;
        let class = class_name(obj, "method call")?;

        let receiver = self.expr_to_val(obj, p)?;
        let mut values = Vec::with_capacity(arguments.len() + 1);
        values.push(receiver.clone());
        values.extend(self.exprs_to_vals(arguments, p)?);

        p.emit(runtime_call(config.assert_not_none.as_str(), vec![receiver]));
        Ok(Expr::Call {
            name: config.mangle(class, method),
            arguments: values,
        })
    }

    /// Allocate one word per field, store every default, then run the initializer
    fn lower_construct(
        &mut self,
        a: &ast::Annotation,
        class: &str,
        p: &mut Prelude,
    ) -> LowerResult<Expr> {
        let config = self.config;
        let fields = self.class_fields_named(class, a.loc)?;

        let obj = self.names.fresh("newObj");
        p.declare(&obj, a.ty.clone());
        p.emit(Stmt::Assign {
            name: obj.clone(),
            value: Expr::Alloc {
                amount: Value::machine_int(fields.len() as u32),
            },
        });
        for slot in fields.values() {
            p.emit(Stmt::Store {
                start: Value::id(&obj),
                offset: Value::machine_int(slot.offset),
                value: slot.default.clone(),
            });
        }
        p.emit(runtime_call(
            config.mangle(class, &config.init_method),
            vec![Value::id(&obj)],
        ));

        Ok(Expr::value(Value::id(obj)))
    }

    /// Allocate a length header plus one word per element
    fn lower_list_literal(
        &mut self,
        a: &ast::Annotation,
        elements: &[ast::Expr],
        p: &mut Prelude,
    ) -> LowerResult<Expr> {
        let list = self.names.fresh("newList");
        p.declare(&list, a.ty.clone());
        p.emit(Stmt::Assign {
            name: list.clone(),
            value: Expr::Alloc {
                amount: Value::machine_int(elements.len() as u32 + 1),
            },
        });

        let values = self.exprs_to_vals(elements, p)?;
        p.emit(Stmt::Store {
            start: Value::id(&list),
            offset: Value::machine_int(0),
            value: Value::num(values.len()),
        });
        for (i, value) in values.into_iter().enumerate() {
            p.emit(Stmt::Store {
                start: Value::id(&list),
                offset: Value::machine_int(i as u32 + 1),
                value,
            });
        }

        Ok(Expr::value(Value::id(list)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Annotation, BinOp, Literal, SourceLocation, Type, UniOp};
    use crate::config::LowerConfig;
    use crate::ir::VarInit;
    use crate::layout::{FieldSlot, FieldTable, LayoutTable};
    use crate::LowerError;
    use num_bigint::BigInt;

    fn a(ty: Type) -> Annotation {
        Annotation::new(ty, SourceLocation::new(1, 1, 1))
    }

    fn num(n: i64) -> ast::Expr {
        ast::Expr::Literal {
            a: a(Type::Number),
            value: Literal::Num {
                value: BigInt::from(n),
            },
        }
    }

    fn id(name: &str, ty: Type) -> ast::Expr {
        ast::Expr::Id {
            a: a(ty),
            name: name.to_string(),
        }
    }

    fn add(left: ast::Expr, right: ast::Expr) -> ast::Expr {
        ast::Expr::BinOp {
            a: a(Type::Number),
            op: BinOp::Plus,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn point_layout() -> LayoutTable {
        let mut fields = FieldTable::new();
        fields.insert(
            "x".to_string(),
            FieldSlot {
                offset: 0,
                default: Value::num(0),
            },
        );
        fields.insert(
            "y".to_string(),
            FieldSlot {
                offset: 1,
                default: Value::Bool { value: true },
            },
        );
        let mut layout = LayoutTable::new();
        layout.insert_class("Point", fields);
        layout
    }

    #[test]
    fn test_atoms_need_no_statements() {
        let layout = LayoutTable::new();
        let config = LowerConfig::default();
        let mut lowerer = Lowerer::new(&layout, &config);

        let flat = lowerer.flatten_expr_to_val(&id("x", Type::Number)).unwrap();
        assert!(flat.inits.is_empty());
        assert!(flat.stmts.is_empty());
        assert_eq!(flat.value, Value::id("x"));

        let flat = lowerer.flatten_expr_to_expr(&num(7)).unwrap();
        assert_eq!(flat.value, Expr::value(Value::num(7)));
        assert_eq!(lowerer.names().last("valname"), None);
    }

    #[test]
    fn test_big_literal_keeps_precision() {
        let layout = LayoutTable::new();
        let config = LowerConfig::default();
        let mut lowerer = Lowerer::new(&layout, &config);
        let big: BigInt = "123456789012345678901234567890".parse().unwrap();
        let literal = ast::Expr::Literal {
            a: a(Type::Number),
            value: Literal::Num { value: big.clone() },
        };

        let flat = lowerer.flatten_expr_to_val(&literal).unwrap();
        assert_eq!(flat.value, Value::Num { value: big });
    }

    #[test]
    fn test_top_level_binop_stays_an_expression() {
        let layout = LayoutTable::new();
        let config = LowerConfig::default();
        let mut lowerer = Lowerer::new(&layout, &config);

        let flat = lowerer
            .flatten_expr_to_expr(&add(id("x", Type::Number), num(1)))
            .unwrap();
        assert!(flat.stmts.is_empty());
        assert_eq!(
            flat.value,
            Expr::BinOp {
                op: BinOp::Plus,
                left: Value::id("x"),
                right: Value::num(1),
            }
        );
    }

    #[test]
    fn test_nested_operands_get_temporaries() {
        let layout = LayoutTable::new();
        let config = LowerConfig::default();
        let mut lowerer = Lowerer::new(&layout, &config);

        // -(x + 1) + 2
        let neg = ast::Expr::UniOp {
            a: a(Type::Number),
            op: UniOp::Neg,
            expr: Box::new(add(id("x", Type::Number), num(1))),
        };
        let flat = lowerer.flatten_expr_to_val(&add(neg, num(2))).unwrap();

        assert_eq!(
            flat.inits,
            vec![
                VarInit::placeholder("valname1", Type::Number),
                VarInit::placeholder("valname2", Type::Number),
                VarInit::placeholder("valname3", Type::Number),
            ]
        );
        assert_eq!(
            flat.stmts,
            vec![
                Stmt::Assign {
                    name: "valname1".into(),
                    value: Expr::BinOp {
                        op: BinOp::Plus,
                        left: Value::id("x"),
                        right: Value::num(1),
                    },
                },
                Stmt::Assign {
                    name: "valname2".into(),
                    value: Expr::UniOp {
                        op: UniOp::Neg,
                        expr: Value::id("valname1"),
                    },
                },
                Stmt::Assign {
                    name: "valname3".into(),
                    value: Expr::BinOp {
                        op: BinOp::Plus,
                        left: Value::id("valname2"),
                        right: Value::num(2),
                    },
                },
            ]
        );
        assert_eq!(flat.value, Value::id("valname3"));
    }

    #[test]
    fn test_call_arguments_left_to_right() {
        let layout = LayoutTable::new();
        let config = LowerConfig::default();
        let mut lowerer = Lowerer::new(&layout, &config);
        let call = ast::Expr::Call {
            a: a(Type::Number),
            name: "f".into(),
            arguments: vec![
                add(num(1), num(2)),
                id("y", Type::Bool),
                add(num(3), num(4)),
            ],
        };

        let flat = lowerer.flatten_expr_to_expr(&call).unwrap();
        assert_eq!(flat.stmts.len(), 2);
        assert_eq!(
            flat.value,
            Expr::Call {
                name: "f".into(),
                arguments: vec![Value::id("valname1"), Value::id("y"), Value::id("valname2")],
            }
        );
    }

    #[test]
    fn test_method_call_checks_receiver_before_call() {
        let layout = point_layout();
        let config = LowerConfig::default();
        let mut lowerer = Lowerer::new(&layout, &config);
        let call = ast::Expr::MethodCall {
            a: a(Type::Number),
            obj: Box::new(id("p", Type::class("Point"))),
            method: "norm".into(),
            arguments: vec![add(num(1), num(2))],
        };

        let flat = lowerer.flatten_expr_to_expr(&call).unwrap();
        assert_eq!(flat.stmts.len(), 2);
        assert_eq!(
            flat.stmts[1],
            runtime_call("assert_not_none", vec![Value::id("p")])
        );
        assert_eq!(
            flat.value,
            Expr::Call {
                name: "Point$norm".into(),
                arguments: vec![Value::id("p"), Value::id("valname1")],
            }
        );
    }

    #[test]
    fn test_method_call_on_non_class_is_internal_error() {
        let layout = point_layout();
        let config = LowerConfig::default();
        let mut lowerer = Lowerer::new(&layout, &config);
        let call = ast::Expr::MethodCall {
            a: a(Type::Number),
            obj: Box::new(id("n", Type::Number)),
            method: "norm".into(),
            arguments: vec![],
        };

        let err = lowerer.flatten_expr_to_expr(&call).unwrap_err();
        assert!(matches!(
            err,
            LowerError::NotAClass {
                context: "method call",
                found: Type::Number,
                ..
            }
        ));
    }

    #[test]
    fn test_lookup_loads_field_offset() {
        let layout = point_layout();
        let config = LowerConfig::default();
        let mut lowerer = Lowerer::new(&layout, &config);
        let lookup = ast::Expr::Lookup {
            a: a(Type::Bool),
            obj: Box::new(id("p", Type::class("Point"))),
            field: "y".into(),
        };

        let flat = lowerer.flatten_expr_to_expr(&lookup).unwrap();
        assert_eq!(
            flat.value,
            Expr::Load {
                start: Value::id("p"),
                offset: Value::machine_int(1),
            }
        );
    }

    #[test]
    fn test_lookup_unknown_field() {
        let layout = point_layout();
        let config = LowerConfig::default();
        let mut lowerer = Lowerer::new(&layout, &config);
        let lookup = ast::Expr::Lookup {
            a: a(Type::Bool),
            obj: Box::new(id("p", Type::class("Point"))),
            field: "z".into(),
        };

        let err = lowerer.flatten_expr_to_expr(&lookup).unwrap_err();
        assert!(matches!(err, LowerError::UnknownField { ref field, .. } if field == "z"));
    }

    #[test]
    fn test_index_emits_bounds_check() {
        let layout = LayoutTable::new();
        let config = LowerConfig::default();
        let mut lowerer = Lowerer::new(&layout, &config);
        let index = ast::Expr::Index {
            a: a(Type::Number),
            obj: Box::new(id("lst", Type::list(Type::Number))),
            index: Box::new(id("i", Type::Number)),
        };

        let flat = lowerer.flatten_expr_to_expr(&index).unwrap();
        assert_eq!(
            flat.stmts,
            vec![
                Stmt::Assign {
                    name: "listlength1".into(),
                    value: Expr::Load {
                        start: Value::id("lst"),
                        offset: Value::machine_int(0),
                    },
                },
                runtime_call(
                    "index_out_of_bounds",
                    vec![Value::id("listlength1"), Value::id("i")]
                ),
                Stmt::Assign {
                    name: "offsetname1".into(),
                    value: Expr::BinOp {
                        op: BinOp::Plus,
                        left: Value::id("i"),
                        right: Value::machine_int(1),
                    },
                },
            ]
        );
        assert_eq!(
            flat.value,
            Expr::Load {
                start: Value::id("lst"),
                offset: Value::id("offsetname1"),
            }
        );
    }

    #[test]
    fn test_index_on_non_list_is_internal_error() {
        let layout = LayoutTable::new();
        let config = LowerConfig::default();
        let mut lowerer = Lowerer::new(&layout, &config);
        let index = ast::Expr::Index {
            a: a(Type::Number),
            obj: Box::new(id("n", Type::Number)),
            index: Box::new(num(0)),
        };

        let err = lowerer.flatten_expr_to_expr(&index).unwrap_err();
        assert!(matches!(err, LowerError::NotAList { .. }));
        assert!(lowerer.names().last("listlength").is_none());
    }

    #[test]
    fn test_construct_stores_defaults_then_inits() {
        let layout = point_layout();
        let config = LowerConfig::default();
        let mut lowerer = Lowerer::new(&layout, &config);
        let construct = ast::Expr::Construct {
            a: a(Type::class("Point")),
            name: "Point".into(),
        };

        let flat = lowerer.flatten_expr_to_val(&construct).unwrap();
        assert_eq!(
            flat.inits,
            vec![VarInit::placeholder("newObj1", Type::class("Point"))]
        );
        assert_eq!(
            flat.stmts,
            vec![
                Stmt::Assign {
                    name: "newObj1".into(),
                    value: Expr::Alloc {
                        amount: Value::machine_int(2),
                    },
                },
                Stmt::Store {
                    start: Value::id("newObj1"),
                    offset: Value::machine_int(0),
                    value: Value::num(0),
                },
                Stmt::Store {
                    start: Value::id("newObj1"),
                    offset: Value::machine_int(1),
                    value: Value::Bool { value: true },
                },
                runtime_call("Point$__init__", vec![Value::id("newObj1")]),
            ]
        );
        assert_eq!(flat.value, Value::id("newObj1"));
    }

    #[test]
    fn test_construct_unknown_class() {
        let layout = LayoutTable::new();
        let config = LowerConfig::default();
        let mut lowerer = Lowerer::new(&layout, &config);
        let construct = ast::Expr::Construct {
            a: a(Type::class("Ghost")),
            name: "Ghost".into(),
        };

        let err = lowerer.flatten_expr_to_val(&construct).unwrap_err();
        assert!(matches!(err, LowerError::UnknownClass { ref class, .. } if class == "Ghost"));
    }

    #[test]
    fn test_list_literal_layout() {
        let layout = LayoutTable::new();
        let config = LowerConfig::default();
        let mut lowerer = Lowerer::new(&layout, &config);
        let list = ast::Expr::ListLiteral {
            a: a(Type::list(Type::Number)),
            elements: vec![num(10), add(num(1), num(2))],
        };

        let flat = lowerer.flatten_expr_to_val(&list).unwrap();
        assert_eq!(flat.inits[0], VarInit::placeholder("newList1", Type::list(Type::Number)));
        assert_eq!(flat.inits[1], VarInit::placeholder("valname1", Type::Number));
        assert_eq!(
            flat.stmts[0],
            Stmt::Assign {
                name: "newList1".into(),
                value: Expr::Alloc {
                    amount: Value::machine_int(3),
                },
            }
        );
        let stores: Vec<_> = flat.stmts[2..].to_vec();
        assert_eq!(
            stores,
            vec![
                Stmt::Store {
                    start: Value::id("newList1"),
                    offset: Value::machine_int(0),
                    value: Value::num(2),
                },
                Stmt::Store {
                    start: Value::id("newList1"),
                    offset: Value::machine_int(1),
                    value: Value::num(10),
                },
                Stmt::Store {
                    start: Value::id("newList1"),
                    offset: Value::machine_int(2),
                    value: Value::id("valname1"),
                },
            ]
        );
    }

    #[test]
    fn test_custom_runtime_names() {
        let layout = point_layout();
        let config = LowerConfig::from_toml_str(
            "assert_not_none = \"rt_check_none\"\nmangle_separator = \"::\"\n",
        )
        .unwrap();
        let mut lowerer = Lowerer::new(&layout, &config);
        let call = ast::Expr::MethodCall {
            a: a(Type::None),
            obj: Box::new(id("p", Type::class("Point"))),
            method: "reset".into(),
            arguments: vec![],
        };

        let flat = lowerer.flatten_expr_to_expr(&call).unwrap();
        assert_eq!(flat.stmts, vec![runtime_call("rt_check_none", vec![Value::id("p")])]);
        assert!(matches!(flat.value, Expr::Call { ref name, .. } if name == "Point::reset"));
    }
}
