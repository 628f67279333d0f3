//! Statement Lowering
//!
//! Appends flattened statements to the current block and opens new blocks
//! where `if` and `while` fork and join.

use super::access::expect_list;
use super::control_flow::BlockArena;
use super::{Lowerer, Prelude};
use crate::ast;
use crate::error::LowerResult;
use crate::ir::{Stmt, Value, VarInit};

impl<'a> Lowerer<'a> {
    /// Lower a statement list into `blocks`, returning the temporaries it introduced
    pub fn lower_stmts(
        &mut self,
        stmts: &[ast::Stmt],
        blocks: &mut BlockArena,
    ) -> LowerResult<Vec<VarInit>> {
        let mut inits = Vec::new();
        for stmt in stmts {
            inits.extend(self.lower_stmt(stmt, blocks)?);
        }
        Ok(inits)
    }

    /// Lower a single statement into `blocks`
    pub fn lower_stmt(
        &mut self,
        stmt: &ast::Stmt,
        blocks: &mut BlockArena,
    ) -> LowerResult<Vec<VarInit>> {
        let mut p = Prelude::default();
        match stmt {
            ast::Stmt::Assign { name, value, .. } => {
                let value = self.expr_to_expr(value, &mut p)?;
                p.emit(Stmt::Assign {
                    name: name.clone(),
                    value,
                });
                Ok(p.flush_into(blocks))
            }

            ast::Stmt::Return { value, .. } => {
                let value = self.expr_to_val(value, &mut p)?;
                p.emit(Stmt::Return { value });
                Ok(p.flush_into(blocks))
            }

            ast::Stmt::Expr { expr, .. } => {
                let expr = self.expr_to_expr(expr, &mut p)?;
                p.emit(Stmt::Expr { expr });
                Ok(p.flush_into(blocks))
            }

            ast::Stmt::Pass { .. } => Ok(Vec::new()),

            ast::Stmt::FieldAssign {
                obj, field, value, ..
            } => {
                let slot = self.field_slot(obj, field, "field assignment")?;
                let start = self.expr_to_val(obj, &mut p)?;
                let value = self.expr_to_val(value, &mut p)?;
                p.emit(Stmt::Store {
                    start,
                    offset: Value::machine_int(slot.offset),
                    value,
                });
                Ok(p.flush_into(blocks))
            }

            ast::Stmt::IndexAssign {
                obj, index, value, ..
            } => {
                expect_list(obj, "index assignment")?;
                let start = self.expr_to_val(obj, &mut p)?;
                let index = self.expr_to_val(index, &mut p)?;
                let value = self.expr_to_val(value, &mut p)?;
                let offset = self.emit_list_index_offset(&index, &start, &mut p);
                p.emit(Stmt::Store {
                    start,
                    offset,
                    value,
                });
                Ok(p.flush_into(blocks))
            }

            ast::Stmt::If { cond, thn, els, .. } => self.lower_if(cond, thn, els, p, blocks),

            ast::Stmt::While { cond, body, .. } => self.lower_while(cond, body, p, blocks),
        }
    }

    /// Lower an if statement
    ///
    /// ```text
    ///   <cond>; ifjmp c ? $then : $else
    /// $then:  <thn>; jmp $end
    /// $else:  <els>; jmp $end
    /// $end:
    /// ```
    fn lower_if(
        &mut self,
        cond: &ast::Expr,
        thn: &[ast::Stmt],
        els: &[ast::Stmt],
        mut p: Prelude,
        blocks: &mut BlockArena,
    ) -> LowerResult<Vec<VarInit>> {
        let then_label = self.names.fresh("$then");
        let else_label = self.names.fresh("$else");
        let end_label = self.names.fresh("$end");

        let cond = self.expr_to_val(cond, &mut p)?;
        p.emit(Stmt::IfJmp {
            cond,
            thn: then_label.clone(),
            els: else_label.clone(),
        });
        let mut inits = p.flush_into(blocks);

        blocks.push_block(then_label);
        inits.extend(self.lower_stmts(thn, blocks)?);
        blocks.emit(Stmt::Jmp {
            lbl: end_label.clone(),
        });

        blocks.push_block(else_label);
        inits.extend(self.lower_stmts(els, blocks)?);
        blocks.emit(Stmt::Jmp {
            lbl: end_label.clone(),
        });

        blocks.push_block(end_label);
        Ok(inits)
    }

    /// Lower a pre-test loop
    ///
    /// ```text
    ///   jmp $whilestart
    /// $whilestart:  <cond>; ifjmp c ? $whilebody : $whileend
    /// $whilebody:   <body>; jmp $whilestart
    /// $whileend:
    /// ```
    fn lower_while(
        &mut self,
        cond: &ast::Expr,
        body: &[ast::Stmt],
        mut p: Prelude,
        blocks: &mut BlockArena,
    ) -> LowerResult<Vec<VarInit>> {
        let start_label = self.names.fresh("$whilestart");
        let body_label = self.names.fresh("$whilebody");
        let end_label = self.names.fresh("$whileend");

        blocks.emit(Stmt::Jmp {
            lbl: start_label.clone(),
        });
        blocks.push_block(start_label.clone());

        let cond = self.expr_to_val(cond, &mut p)?;
        p.emit(Stmt::IfJmp {
            cond,
            thn: body_label.clone(),
            els: end_label.clone(),
        });
        let mut inits = p.flush_into(blocks);

        blocks.push_block(body_label);
        inits.extend(self.lower_stmts(body, blocks)?);
        blocks.emit(Stmt::Jmp { lbl: start_label });

        blocks.push_block(end_label);
        Ok(inits)
    }
}
