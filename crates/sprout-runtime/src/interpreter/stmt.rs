//! Statement execution

use crate::ast::*;
use crate::interpreter::{is_builtin, ControlFlow, Interpreter};
use crate::value::{RuntimeError, Value};

impl Interpreter {
    /// Execute a statement
    pub(crate) fn exec_statement(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        self.consume_step(stmt.span())?;

        match stmt {
            Stmt::Assign(assign) => self.exec_assign(assign),
            Stmt::Expr(expr_stmt) => self.exec_expr_stmt(expr_stmt),
            Stmt::If(if_stmt) => self.exec_if(if_stmt),
            Stmt::For(for_stmt) => self.exec_for(for_stmt),
            Stmt::Return(return_stmt) => self.exec_return(return_stmt),
            Stmt::Append(append) => self.exec_append(append),
        }
    }

    /// Execute an assignment
    fn exec_assign(&mut self, assign: &Assign) -> Result<(), RuntimeError> {
        let value = self.eval_expr(&assign.value)?;
        self.assign_variable(&assign.name.name, value);
        Ok(())
    }

    /// Execute a bare call statement.
    ///
    /// A call to a name that is neither user-defined nor builtin is skipped
    /// without evaluating its arguments; the source app silently ignored
    /// such lines and learners rely on that.
    fn exec_expr_stmt(&mut self, expr_stmt: &ExprStmt) -> Result<(), RuntimeError> {
        if let Expr::Call(call) = &expr_stmt.expr {
            let name = call.callee.name.as_str();
            if !self.functions.contains_key(name) && !is_builtin(name) {
                return Ok(());
            }
        }

        self.eval_expr(&expr_stmt.expr)?;
        Ok(())
    }

    /// Execute an if/elif/else chain: first true branch wins
    fn exec_if(&mut self, if_stmt: &IfStmt) -> Result<(), RuntimeError> {
        for branch in &if_stmt.branches {
            if self.eval_condition(&branch.cond)? {
                return self.exec_block(&branch.block);
            }
        }

        if let Some(else_block) = &if_stmt.else_block {
            return self.exec_block(else_block);
        }

        Ok(())
    }

    /// Execute a for loop over a list value
    fn exec_for(&mut self, for_stmt: &ForStmt) -> Result<(), RuntimeError> {
        let iterable = self.eval_expr(&for_stmt.iterable)?;

        let items = match iterable {
            Value::List(list) => list.snapshot(),
            other => {
                return Err(RuntimeError::TypeError {
                    msg: format!("cannot loop over a {}", other.type_name()),
                    span: for_stmt.iterable.span(),
                })
            }
        };

        for item in items {
            self.consume_step(for_stmt.span)?;
            self.assign_variable(&for_stmt.var.name, item);
            self.exec_block(&for_stmt.body)?;
            if self.control_flow != ControlFlow::None {
                break;
            }
        }

        Ok(())
    }

    /// Execute a return statement
    fn exec_return(&mut self, return_stmt: &ReturnStmt) -> Result<(), RuntimeError> {
        let value = match &return_stmt.value {
            Some(expr) => self.eval_expr(expr)?,
            None => Value::None,
        };
        self.control_flow = ControlFlow::Return(value);
        Ok(())
    }

    /// Execute a `name.append(expr)` statement
    fn exec_append(&mut self, append: &AppendStmt) -> Result<(), RuntimeError> {
        let value = self.eval_expr(&append.value)?;
        let target = self.get_variable(&append.target.name, append.target.span)?;

        match target {
            Value::List(list) => {
                list.push(value);
                Ok(())
            }
            other => Err(RuntimeError::TypeError {
                msg: format!("cannot append to a {}", other.type_name()),
                span: append.span,
            }),
        }
    }
}
