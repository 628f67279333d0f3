//! Pretty-printing for IR
//!
//! Provides human-readable output for debugging IR structures.

use super::block::BasicBlock;
use super::program::{Class, FunDef, Program, VarInit};
use std::fmt::Write;

/// Trait for pretty-printing IR constructs
pub trait PrettyPrint {
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Program {
    fn pretty_print(&self) -> String {
        let mut output = String::new();

        for class in &self.classes {
            output.push_str(&class.pretty_print());
            writeln!(output).unwrap();
        }

        for func in &self.funs {
            output.push_str(&func.pretty_print());
            writeln!(output).unwrap();
        }

        writeln!(output, "; top level").unwrap();
        for init in &self.inits {
            writeln!(output, "{}", format_var_init(init)).unwrap();
        }
        for block in &self.body {
            output.push_str(&block.pretty_print_indented(0));
        }

        output
    }
}

impl PrettyPrint for Class {
    fn pretty_print(&self) -> String {
        let mut output = String::new();
        writeln!(output, "class {} {{", self.name).unwrap();
        for field in &self.fields {
            writeln!(output, "  field {}: {} = {}", field.name, field.ty, field.value).unwrap();
        }
        for method in &self.methods {
            for line in method.pretty_print().lines() {
                writeln!(output, "  {}", line).unwrap();
            }
        }
        writeln!(output, "}}").unwrap();
        output
    }
}

impl PrettyPrint for FunDef {
    fn pretty_print(&self) -> String {
        let mut output = String::new();

        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty))
            .collect();
        writeln!(output, "fun {}({}) -> {} {{", self.name, params.join(", "), self.ret).unwrap();

        for init in &self.inits {
            writeln!(output, "  {}", format_var_init(init)).unwrap();
        }

        for block in &self.body {
            output.push_str(&block.pretty_print_indented(2));
        }

        writeln!(output, "}}").unwrap();
        output
    }
}

impl PrettyPrint for BasicBlock {
    fn pretty_print(&self) -> String {
        self.pretty_print_indented(0)
    }
}

impl BasicBlock {
    fn pretty_print_indented(&self, indent: usize) -> String {
        let mut output = String::new();
        let prefix = " ".repeat(indent);

        writeln!(output, "{}{}:", prefix, self.label).unwrap();
        for stmt in &self.stmts {
            writeln!(output, "{}  {}", prefix, stmt).unwrap();
        }

        output
    }
}

fn format_var_init(init: &VarInit) -> String {
    format!("var {}: {} = {}", init.name, init.ty, init.value)
}
