//! AST interpreter (tree-walking)
//!
//! Two-pass evaluation of a parsed snippet:
//! 1. Definition pass: register every function definition (a redefinition
//!    silently replaces the earlier one — last definition wins)
//! 2. Execution pass: run top-level statements in source order
//!
//! Scope rules of the teaching language: a function call builds a local
//! environment seeded with a snapshot of the globals at call time, then binds
//! arguments positionally. Assignments inside a body write the local map
//! only, so scalar "global" writes never leak out of a call. Lists are the
//! one exception: they carry reference semantics, so `.append` on a list
//! parameter mutates the caller's list.
//!
//! Each run is independent; all tables live on the Interpreter, which is
//! built fresh per run and discarded afterwards.

mod expr;
mod stmt;

use crate::ast::{Block, Item, Program};
use crate::span::Span;
use crate::value::{RuntimeError, Value};
use std::collections::HashMap;

/// Default execution step budget (statements + loop iterations + calls)
pub const DEFAULT_STEP_BUDGET: u64 = 100_000;

/// Deepest allowed call nesting; the budget alone would let runaway
/// recursion exhaust the host stack first
pub(crate) const MAX_CALL_DEPTH: usize = 200;

/// Control flow signal for handling return
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ControlFlow {
    None,
    Return(Value),
}

/// User-defined function captured during the definition pass
#[derive(Debug, Clone)]
pub(crate) struct UserFunction {
    pub(crate) params: Vec<String>,
    pub(crate) body: Block,
}

/// Names handled by the interpreter itself rather than the function table
pub fn is_builtin(name: &str) -> bool {
    matches!(name, "print" | "len" | "str" | "range")
}

/// Interpreter state for one run
pub struct Interpreter {
    /// Top-level variables
    pub(crate) globals: HashMap<String, Value>,
    /// Call frames; empty at top level
    pub(crate) locals: Vec<HashMap<String, Value>>,
    /// Function table built by the definition pass
    pub(crate) functions: HashMap<String, UserFunction>,
    /// Current control flow state
    pub(crate) control_flow: ControlFlow,
    /// Output log appended to by print()
    pub(crate) output: Vec<String>,
    /// Remaining execution steps before the run is cut off
    pub(crate) steps_remaining: u64,
}

impl Interpreter {
    /// Create a new interpreter with the given step budget
    pub fn new(step_budget: u64) -> Self {
        Self {
            globals: HashMap::new(),
            locals: Vec::new(),
            functions: HashMap::new(),
            control_flow: ControlFlow::None,
            output: Vec::new(),
            steps_remaining: step_budget,
        }
    }

    /// Run a program and return its output log
    pub fn run(&mut self, program: &Program) -> Result<Vec<String>, RuntimeError> {
        // Definition pass: last definition wins, no error on redefinition
        for item in &program.items {
            if let Item::Function(func) = item {
                self.functions.insert(
                    func.name.name.clone(),
                    UserFunction {
                        params: func.params.iter().map(|p| p.name.clone()).collect(),
                        body: func.body.clone(),
                    },
                );
            }
        }

        // Execution pass: top-level statements in source order
        for item in &program.items {
            if let Item::Statement(stmt) = item {
                self.exec_statement(stmt)?;
            }
        }

        Ok(std::mem::take(&mut self.output))
    }

    /// Look up a variable: current frame if inside a call, globals otherwise.
    /// Frames are seeded with a globals snapshot, so there is no fallthrough.
    pub(crate) fn get_variable(&self, name: &str, span: Span) -> Result<Value, RuntimeError> {
        let scope = self.locals.last().unwrap_or(&self.globals);

        scope
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
                span,
            })
    }

    /// Bind a variable in the innermost scope
    pub(crate) fn assign_variable(&mut self, name: &str, value: Value) {
        let scope = self.locals.last_mut().unwrap_or(&mut self.globals);
        scope.insert(name.to_string(), value);
    }

    /// Spend one execution step, failing once the budget is exhausted
    pub(crate) fn consume_step(&mut self, span: Span) -> Result<(), RuntimeError> {
        if self.steps_remaining == 0 {
            return Err(RuntimeError::StepBudgetExceeded { span });
        }
        self.steps_remaining -= 1;
        Ok(())
    }

    /// Execute a block, stopping early on a return signal
    pub(crate) fn exec_block(&mut self, block: &Block) -> Result<(), RuntimeError> {
        for stmt in &block.stmts {
            self.exec_statement(stmt)?;
            if self.control_flow != ControlFlow::None {
                break;
            }
        }
        Ok(())
    }
}
