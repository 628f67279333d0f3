//! AST to IR Lowering
//!
//! Converts the type-checked AST into basic-block IR: nested expressions are
//! flattened into single-operator statements over simple values, structured
//! control flow becomes labeled blocks with explicit jumps, field and list
//! accesses become loads and stores at concrete offsets, and runtime checks
//! are emitted next to every risky operation.

mod access;
mod control_flow;
mod expr;
mod names;
mod stmt;

pub use control_flow::BlockArena;
pub use names::NameGenerator;

use crate::ast;
use crate::config::LowerConfig;
use crate::error::{LowerError, LowerResult};
use crate::ir::{self, BasicBlock, Stmt, VarInit};
use crate::layout::ClassLayout;
use tracing::{debug, debug_span};

/// Result of flattening an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flattened<T> {
    /// Variables introduced on the way, needing storage
    pub inits: Vec<VarInit>,
    /// Statements that must run before `value` is available
    pub stmts: Vec<Stmt>,
    /// The flat expression or simple value
    pub value: T,
}

/// Declarations and statements accumulated while flattening
#[derive(Debug, Default)]
pub(crate) struct Prelude {
    inits: Vec<VarInit>,
    stmts: Vec<Stmt>,
}

impl Prelude {
    /// Give a temporary storage, initialized to none
    fn declare(&mut self, name: &str, ty: ast::Type) {
        self.inits.push(VarInit::placeholder(name, ty));
    }

    fn emit(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    fn finish<T>(self, value: T) -> Flattened<T> {
        Flattened {
            inits: self.inits,
            stmts: self.stmts,
            value,
        }
    }

    /// Move the statements into the current block, handing back the declarations
    fn flush_into(self, blocks: &mut BlockArena) -> Vec<VarInit> {
        blocks.emit_all(self.stmts);
        self.inits
    }
}

/// AST to IR lowerer
///
/// One lowerer is one naming session: every name it generates is unique
/// across everything it lowers.
pub struct Lowerer<'a> {
    /// Class field offsets and defaults
    layout: &'a dyn ClassLayout,
    /// Runtime helper names and mangling convention
    config: &'a LowerConfig,
    /// Fresh label and temporary names
    names: NameGenerator,
}

impl<'a> Lowerer<'a> {
    /// Create a new lowerer
    pub fn new(layout: &'a dyn ClassLayout, config: &'a LowerConfig) -> Self {
        Self::with_names(layout, config, NameGenerator::new())
    }

    /// Create a lowerer continuing from an existing name generator
    pub fn with_names(
        layout: &'a dyn ClassLayout,
        config: &'a LowerConfig,
        names: NameGenerator,
    ) -> Self {
        Self {
            layout,
            config,
            names,
        }
    }

    /// Name generator state
    pub fn names(&self) -> &NameGenerator {
        &self.names
    }

    /// Give back the name generator, e.g. to seed a follow-up session
    pub fn into_names(self) -> NameGenerator {
        self.names
    }

    /// Lower a whole program
    pub fn lower_program(&mut self, program: &ast::Program) -> LowerResult<ir::Program> {
        let (mut inits, body) = self.lower_body("$startProg", &program.stmts)?;
        inits.extend(lower_var_inits(&program.inits));

        let funs = self.lower_fun_defs(&program.funs)?;
        let classes = program
            .classes
            .iter()
            .map(|class| self.lower_class(class))
            .collect::<LowerResult<Vec<_>>>()?;

        let lowered = ir::Program {
            funs,
            inits,
            classes,
            body,
        };

        if self.config.validate {
            lowered
                .validate()
                .map_err(|errors| LowerError::InvalidIr { errors })?;
        }

        debug!(
            functions = lowered.funs.len(),
            classes = lowered.classes.len(),
            blocks = lowered.body.len(),
            "lowered program"
        );
        Ok(lowered)
    }

    /// Lower a statement list into a fresh block list
    ///
    /// Returns the variables introduced while lowering and the blocks, the
    /// first of which is labeled after `entry_base`. The last block is left
    /// as is: no implicit return is added.
    pub fn lower_body(
        &mut self,
        entry_base: &str,
        stmts: &[ast::Stmt],
    ) -> LowerResult<(Vec<VarInit>, Vec<BasicBlock>)> {
        let mut blocks = BlockArena::new(self.names.fresh(entry_base));
        let inits = self.lower_stmts(stmts, &mut blocks)?;
        Ok((inits, blocks.into_blocks()))
    }

    fn lower_fun_defs(&mut self, funs: &[ast::FunDef]) -> LowerResult<Vec<ir::FunDef>> {
        funs.iter().map(|f| self.lower_fun_def(f)).collect()
    }

    /// Lower a function or method definition
    fn lower_fun_def(&mut self, fun: &ast::FunDef) -> LowerResult<ir::FunDef> {
        let _span = debug_span!("lower_function", function = %fun.name).entered();

        let (mut inits, body) = self.lower_body("$startFun", &fun.body)?;
        let temporaries = inits.len();
        inits.extend(lower_var_inits(&fun.inits));

        debug!(blocks = body.len(), temporaries, "lowered function");
        Ok(ir::FunDef {
            name: fun.name.clone(),
            parameters: fun.parameters.clone(),
            ret: fun.ret.clone(),
            inits,
            body,
        })
    }

    /// Lower a class: its field initializers and every method
    fn lower_class(&mut self, class: &ast::Class) -> LowerResult<ir::Class> {
        let _span = debug_span!("lower_class", class = %class.name).entered();

        Ok(ir::Class {
            name: class.name.clone(),
            fields: lower_var_inits(&class.fields),
            methods: self.lower_fun_defs(&class.methods)?,
        })
    }
}

/// Call to a runtime helper, evaluated for its effect only
fn runtime_call(name: impl Into<String>, arguments: Vec<ir::Value>) -> Stmt {
    Stmt::Expr {
        expr: ir::Expr::Call {
            name: name.into(),
            arguments,
        },
    }
}

fn lower_var_inits(inits: &[ast::VarInit]) -> Vec<VarInit> {
    inits.iter().map(lower_var_init).collect()
}

fn lower_var_init(init: &ast::VarInit) -> VarInit {
    VarInit {
        name: init.name.clone(),
        ty: init.ty.clone(),
        value: ir::Value::from(&init.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Annotation, Literal, SourceLocation, Type};
    use crate::layout::LayoutTable;
    use num_bigint::BigInt;

    fn a(ty: Type) -> Annotation {
        Annotation::new(ty, SourceLocation::default())
    }

    fn num(n: i64) -> ast::Expr {
        ast::Expr::Literal {
            a: a(Type::Number),
            value: Literal::Num {
                value: BigInt::from(n),
            },
        }
    }

    #[test]
    fn test_empty_program_has_one_block() {
        let layout = LayoutTable::new();
        let config = LowerConfig::default();
        let mut lowerer = Lowerer::new(&layout, &config);
        let program = lowerer.lower_program(&ast::Program::default()).unwrap();

        assert_eq!(program.body.len(), 1);
        assert_eq!(program.body[0].label, "$startProg1");
        assert!(program.body[0].is_empty());
    }

    #[test]
    fn test_names_continue_across_functions() {
        let layout = LayoutTable::new();
        let config = LowerConfig::default();
        let fun = |name: &str| ast::FunDef {
            name: name.to_string(),
            parameters: vec![],
            ret: Type::Number,
            inits: vec![],
            body: vec![ast::Stmt::Return {
                a: a(Type::None),
                value: num(1),
            }],
            loc: SourceLocation::default(),
        };
        let program = ast::Program {
            funs: vec![fun("f"), fun("g")],
            ..Default::default()
        };

        let mut lowerer = Lowerer::new(&layout, &config);
        let lowered = lowerer.lower_program(&program).unwrap();
        assert_eq!(lowered.funs[0].body[0].label, "$startFun1");
        assert_eq!(lowered.funs[1].body[0].label, "$startFun2");
        assert_eq!(lowerer.names().last("$startFun"), Some(2));

        let mut next = Lowerer::with_names(&layout, &config, lowerer.into_names());
        let again = next.lower_program(&program).unwrap();
        assert_eq!(again.body[0].label, "$startProg2");
        assert_eq!(again.funs[0].body[0].label, "$startFun3");
    }

    #[test]
    fn test_declared_inits_follow_temporaries() {
        let layout = LayoutTable::new();
        let config = LowerConfig::default();
        let program = ast::Program {
            inits: vec![ast::VarInit {
                name: "x".to_string(),
                ty: Type::Number,
                value: Literal::Num {
                    value: BigInt::from(3),
                },
                loc: SourceLocation::default(),
            }],
            stmts: vec![ast::Stmt::Expr {
                a: a(Type::None),
                expr: ast::Expr::UniOp {
                    a: a(Type::Number),
                    op: ast::UniOp::Neg,
                    expr: Box::new(ast::Expr::UniOp {
                        a: a(Type::Number),
                        op: ast::UniOp::Neg,
                        expr: Box::new(num(2)),
                    }),
                },
            }],
            ..Default::default()
        };

        let mut lowerer = Lowerer::new(&layout, &config);
        let lowered = lowerer.lower_program(&program).unwrap();
        let names: Vec<&str> = lowered.inits.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["valname1", "x"]);
        assert_eq!(lowered.inits[1].value, ir::Value::num(3));
    }
}
