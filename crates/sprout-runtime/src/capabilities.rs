//! Capability gating
//!
//! One engine serves every lesson; lessons differ only in which language
//! constructs are unlocked. The gate is a validation pass over the parsed
//! program, run before execution, so a locked construct is reported with a
//! span instead of failing mid-run.

use crate::ast::*;
use crate::diagnostic::Diagnostic;
use serde::{Deserialize, Serialize};

/// Language constructs a lesson may unlock.
///
/// The full set is the default so library users who never touch lessons get
/// the whole language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Capabilities {
    /// Function definitions may take more than one parameter
    pub multi_param: bool,
    /// `if`/`elif`/`else` chains
    pub conditionals: bool,
    /// List literals and `.append`
    pub lists: bool,
    /// `for` loops (and `range`)
    pub loops: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities::full()
    }
}

impl Capabilities {
    /// Everything unlocked
    pub fn full() -> Self {
        Capabilities {
            multi_param: true,
            conditionals: true,
            lists: true,
            loops: true,
        }
    }

    /// Nothing beyond single-parameter functions unlocked
    pub fn starter() -> Self {
        Capabilities {
            multi_param: false,
            conditionals: false,
            lists: false,
            loops: false,
        }
    }

    /// Preset for a lesson tier. Tiers unlock cumulatively: multi-parameter
    /// functions, then conditionals, then lists, then loops.
    pub fn tier(tier: u8) -> Self {
        Capabilities {
            multi_param: tier >= 1,
            conditionals: tier >= 2,
            lists: tier >= 3,
            loops: tier >= 4,
        }
    }

    /// Validate a program against this capability set. Returns every locked
    /// construct found, not just the first.
    pub fn check(&self, program: &Program) -> Vec<Diagnostic> {
        let mut checker = CapabilityCheck {
            capabilities: *self,
            diagnostics: Vec::new(),
        };
        checker.check_program(program);
        checker.diagnostics
    }
}

struct CapabilityCheck {
    capabilities: Capabilities,
    diagnostics: Vec<Diagnostic>,
}

impl CapabilityCheck {
    fn locked(&mut self, what: &str, span: crate::span::Span) {
        self.diagnostics.push(Diagnostic::error_with_code(
            "SP3001",
            format!("{} are not unlocked in this lesson", what),
            span,
        ));
    }

    fn check_program(&mut self, program: &Program) {
        for item in &program.items {
            match item {
                Item::Function(func) => {
                    if !self.capabilities.multi_param && func.params.len() > 1 {
                        self.locked("multi-parameter functions", func.span);
                    }
                    self.check_block(&func.body);
                }
                Item::Statement(stmt) => self.check_statement(stmt),
            }
        }
    }

    fn check_block(&mut self, block: &Block) {
        for stmt in &block.stmts {
            self.check_statement(stmt);
        }
    }

    fn check_statement(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign(assign) => self.check_expr(&assign.value),
            Stmt::Expr(expr_stmt) => self.check_expr(&expr_stmt.expr),
            Stmt::If(if_stmt) => {
                if !self.capabilities.conditionals {
                    self.locked("conditionals", if_stmt.span);
                }
                for branch in &if_stmt.branches {
                    self.check_expr(&branch.cond.lhs);
                    self.check_expr(&branch.cond.rhs);
                    self.check_block(&branch.block);
                }
                if let Some(else_block) = &if_stmt.else_block {
                    self.check_block(else_block);
                }
            }
            Stmt::For(for_stmt) => {
                if !self.capabilities.loops {
                    self.locked("loops", for_stmt.span);
                }
                self.check_expr(&for_stmt.iterable);
                self.check_block(&for_stmt.body);
            }
            Stmt::Return(return_stmt) => {
                if let Some(value) = &return_stmt.value {
                    self.check_expr(value);
                }
            }
            Stmt::Append(append) => {
                if !self.capabilities.lists {
                    self.locked("lists", append.span);
                }
                self.check_expr(&append.value);
            }
        }
    }

    fn check_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::List(list) => {
                if !self.capabilities.lists {
                    self.locked("lists", list.span);
                }
                for item in &list.items {
                    self.check_expr(item);
                }
            }
            Expr::Call(call) => {
                if !self.capabilities.loops && call.callee.name == "range" {
                    self.locked("loops", call.span);
                }
                for arg in &call.args {
                    self.check_expr(arg);
                }
            }
            Expr::Binary(binary) => {
                self.check_expr(&binary.lhs);
                self.check_expr(&binary.rhs);
            }
            Expr::Number(..) | Expr::Str(..) | Expr::FString(_) | Expr::Name(_) => {}
        }
    }
}
