//! Tree builders and IR scanners shared by the integration tests.

#![allow(dead_code)]

use cobra_lower::ast::{self, Annotation, BinOp, Literal, SourceLocation, Type};
use cobra_lower::ir;
use cobra_lower::{lower_program, LowerConfig, LowerResult};
use num_bigint::BigInt;

pub fn ann(ty: Type) -> Annotation {
    Annotation::new(ty, SourceLocation::new(1, 1, 1))
}

pub fn num(n: i64) -> ast::Expr {
    ast::Expr::Literal {
        a: ann(Type::Number),
        value: Literal::Num {
            value: BigInt::from(n),
        },
    }
}

pub fn boolean(b: bool) -> ast::Expr {
    ast::Expr::Literal {
        a: ann(Type::Bool),
        value: Literal::Bool { value: b },
    }
}

pub fn var(name: &str, ty: Type) -> ast::Expr {
    ast::Expr::Id {
        a: ann(ty),
        name: name.to_string(),
    }
}

pub fn binop(op: BinOp, ty: Type, left: ast::Expr, right: ast::Expr) -> ast::Expr {
    ast::Expr::BinOp {
        a: ann(ty),
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn method_call(obj: ast::Expr, method: &str, arguments: Vec<ast::Expr>) -> ast::Expr {
    ast::Expr::MethodCall {
        a: ann(Type::Number),
        obj: Box::new(obj),
        method: method.to_string(),
        arguments,
    }
}

pub fn index(obj: ast::Expr, idx: ast::Expr) -> ast::Expr {
    ast::Expr::Index {
        a: ann(Type::Number),
        obj: Box::new(obj),
        index: Box::new(idx),
    }
}

pub fn lookup(obj: ast::Expr, field: &str) -> ast::Expr {
    ast::Expr::Lookup {
        a: ann(Type::Number),
        obj: Box::new(obj),
        field: field.to_string(),
    }
}

pub fn call(name: &str, arguments: Vec<ast::Expr>) -> ast::Expr {
    ast::Expr::Call {
        a: ann(Type::Number),
        name: name.to_string(),
        arguments,
    }
}

pub fn assign(name: &str, value: ast::Expr) -> ast::Stmt {
    ast::Stmt::Assign {
        a: ann(Type::None),
        name: name.to_string(),
        value,
    }
}

pub fn expr_stmt(expr: ast::Expr) -> ast::Stmt {
    ast::Stmt::Expr {
        a: ann(Type::None),
        expr,
    }
}

pub fn if_stmt(cond: ast::Expr, thn: Vec<ast::Stmt>, els: Vec<ast::Stmt>) -> ast::Stmt {
    ast::Stmt::If {
        a: ann(Type::None),
        cond,
        thn,
        els,
    }
}

pub fn while_stmt(cond: ast::Expr, body: Vec<ast::Stmt>) -> ast::Stmt {
    ast::Stmt::While {
        a: ann(Type::None),
        cond,
        body,
    }
}

pub fn var_init(name: &str, ty: Type, value: Literal) -> ast::VarInit {
    ast::VarInit {
        name: name.to_string(),
        ty,
        value,
        loc: SourceLocation::default(),
    }
}

/// `class Foo` with fields `x: int = 0`, `flag: bool = false` and a `foo(self) -> int` method
pub fn foo_class() -> ast::Class {
    ast::Class {
        name: "Foo".to_string(),
        fields: vec![
            var_init(
                "x",
                Type::Number,
                Literal::Num {
                    value: BigInt::from(0),
                },
            ),
            var_init("flag", Type::Bool, Literal::Bool { value: false }),
        ],
        methods: vec![ast::FunDef {
            name: "foo".to_string(),
            parameters: vec![ast::Parameter {
                name: "self".to_string(),
                ty: Type::class("Foo"),
            }],
            ret: Type::Number,
            inits: vec![],
            body: vec![ast::Stmt::Return {
                a: ann(Type::None),
                value: lookup(var("self", Type::class("Foo")), "x"),
            }],
            loc: SourceLocation::default(),
        }],
        loc: SourceLocation::default(),
    }
}

/// Program made of top-level statements plus the `Foo` class
pub fn program(stmts: Vec<ast::Stmt>) -> ast::Program {
    ast::Program {
        classes: vec![foo_class()],
        stmts,
        ..Default::default()
    }
}

pub fn lower(stmts: Vec<ast::Stmt>) -> LowerResult<ir::Program> {
    let config = LowerConfig {
        validate: true,
        ..LowerConfig::default()
    };
    lower_program(&program(stmts), &config)
}

/// Every statement of every block, in program order
pub fn all_stmts(program: &ir::Program) -> Vec<&ir::Stmt> {
    program.all_blocks().flat_map(|b| b.stmts.iter()).collect()
}

/// Whether `stmt` is a call to the named runtime helper
pub fn is_call_to<'s>(stmt: &'s ir::Stmt, helper: &str) -> Option<&'s [ir::Value]> {
    match stmt {
        ir::Stmt::Expr {
            expr: ir::Expr::Call { name, arguments },
        } if name == helper => Some(arguments),
        _ => None,
    }
}
