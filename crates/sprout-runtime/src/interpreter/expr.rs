//! Expression evaluation

use crate::ast::*;
use crate::interpreter::{ControlFlow, Interpreter, UserFunction, MAX_CALL_DEPTH};
use crate::value::{RuntimeError, SharedList, Value};

impl Interpreter {
    /// Evaluate an expression to a value
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Number(n, _) => Ok(Value::Number(*n)),
            Expr::Str(s, _) => Ok(Value::string(s)),
            Expr::FString(fstring) => self.eval_fstring(fstring),
            Expr::Name(id) => self.get_variable(&id.name, id.span),
            Expr::List(list) => {
                let items = list
                    .items
                    .iter()
                    .map(|item| self.eval_expr(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::List(SharedList::new(items)))
            }
            Expr::Call(call) => self.eval_call(call),
            Expr::Binary(binary) => self.eval_binary(binary),
        }
    }

    /// Evaluate an f-string by interpolating variable values into the holes
    fn eval_fstring(&mut self, fstring: &FString) -> Result<Value, RuntimeError> {
        let mut result = String::new();

        for segment in &fstring.segments {
            match segment {
                FSegment::Text(text) => result.push_str(text),
                FSegment::Interp(id) => {
                    let value = self.get_variable(&id.name, id.span)?;
                    result.push_str(&value.to_string());
                }
            }
        }

        Ok(Value::string(result))
    }

    /// Evaluate binary arithmetic. Numbers support all four operators;
    /// strings support `+` as concatenation. Division by zero follows IEEE
    /// semantics (infinity), it does not raise.
    fn eval_binary(&mut self, binary: &BinaryExpr) -> Result<Value, RuntimeError> {
        let lhs = self.eval_expr(&binary.lhs)?;
        let rhs = self.eval_expr(&binary.rhs)?;

        match (&lhs, &rhs) {
            (Value::Number(a), Value::Number(b)) => {
                let result = match binary.op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                };
                Ok(Value::Number(result))
            }
            (Value::Str(a), Value::Str(b)) if binary.op == BinaryOp::Add => {
                Ok(Value::string(format!("{}{}", a, b)))
            }
            _ => Err(RuntimeError::TypeError {
                msg: format!(
                    "cannot apply '{}' to {} and {}",
                    binary.op.as_str(),
                    lhs.type_name(),
                    rhs.type_name()
                ),
                span: binary.span,
            }),
        }
    }

    /// Evaluate a condition with the safe comparator: equality works across
    /// any types (mismatched types are simply unequal); ordering requires
    /// two numbers or two strings.
    pub(crate) fn eval_condition(&mut self, cond: &Condition) -> Result<bool, RuntimeError> {
        let lhs = self.eval_expr(&cond.lhs)?;
        let rhs = self.eval_expr(&cond.rhs)?;

        match cond.op {
            CompareOp::Eq => Ok(lhs == rhs),
            CompareOp::NotEq => Ok(lhs != rhs),
            op => {
                let ordering = match (&lhs, &rhs) {
                    (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                    (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
                    _ => {
                        return Err(RuntimeError::TypeError {
                            msg: format!(
                                "cannot compare {} and {} with '{}'",
                                lhs.type_name(),
                                rhs.type_name(),
                                op.as_str()
                            ),
                            span: cond.span,
                        })
                    }
                };

                // NaN comparisons are false, matching host float semantics
                let Some(ordering) = ordering else {
                    return Ok(false);
                };

                Ok(match op {
                    CompareOp::Less => ordering.is_lt(),
                    CompareOp::LessEq => ordering.is_le(),
                    CompareOp::Greater => ordering.is_gt(),
                    CompareOp::GreaterEq => ordering.is_ge(),
                    CompareOp::Eq | CompareOp::NotEq => unreachable!(),
                })
            }
        }
    }

    /// Evaluate a call in value position. User-defined functions shadow
    /// builtins of the same name.
    pub(crate) fn eval_call(&mut self, call: &CallExpr) -> Result<Value, RuntimeError> {
        let name = call.callee.name.as_str();

        if let Some(func) = self.functions.get(name).cloned() {
            return self.call_user_function(call, func);
        }

        match name {
            "print" => self.builtin_print(call),
            "len" => self.builtin_len(call),
            "str" => self.builtin_str(call),
            "range" => self.builtin_range(call),
            _ => Err(RuntimeError::UnknownFunction {
                name: name.to_string(),
                span: call.callee.span,
            }),
        }
    }

    /// Call a user-defined function
    fn call_user_function(
        &mut self,
        call: &CallExpr,
        func: UserFunction,
    ) -> Result<Value, RuntimeError> {
        self.consume_step(call.span)?;
        if self.locals.len() >= MAX_CALL_DEPTH {
            return Err(RuntimeError::RecursionLimit { span: call.span });
        }

        if call.args.len() != func.params.len() {
            return Err(RuntimeError::ArityMismatch {
                name: call.callee.name.clone(),
                expected: func.params.len(),
                got: call.args.len(),
                span: call.span,
            });
        }

        // Arguments evaluate in the caller's scope
        let args = call
            .args
            .iter()
            .map(|arg| self.eval_expr(arg))
            .collect::<Result<Vec<_>, _>>()?;

        // Local environment: globals snapshot, then positional bindings.
        // List values share their storage, which is what lets .append on a
        // parameter reach the caller's list.
        let mut frame = self.globals.clone();
        for (param, value) in func.params.iter().zip(args) {
            frame.insert(param.clone(), value);
        }

        self.locals.push(frame);
        let result = self.exec_block(&func.body);
        self.locals.pop();
        result?;

        match std::mem::replace(&mut self.control_flow, ControlFlow::None) {
            ControlFlow::Return(value) => Ok(value),
            ControlFlow::None => Ok(Value::None),
        }
    }

    // === Builtins ===

    /// print(...): render arguments separated by spaces into the output log
    fn builtin_print(&mut self, call: &CallExpr) -> Result<Value, RuntimeError> {
        let mut parts = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            parts.push(self.eval_expr(arg)?.to_string());
        }
        self.output.push(parts.join(" "));
        Ok(Value::None)
    }

    /// len(x): item count of a list, character count of a string
    fn builtin_len(&mut self, call: &CallExpr) -> Result<Value, RuntimeError> {
        let arg = self.single_arg(call)?;
        match self.eval_expr(arg)? {
            Value::List(list) => Ok(Value::Number(list.len() as f64)),
            Value::Str(s) => Ok(Value::Number(s.chars().count() as f64)),
            other => Err(RuntimeError::TypeError {
                msg: format!("len() does not accept a {}", other.type_name()),
                span: call.span,
            }),
        }
    }

    /// str(x): render any value to its display string
    fn builtin_str(&mut self, call: &CallExpr) -> Result<Value, RuntimeError> {
        let arg = self.single_arg(call)?;
        let value = self.eval_expr(arg)?;
        Ok(Value::string(value.to_string()))
    }

    /// range(end) / range(start, end): list of whole numbers
    fn builtin_range(&mut self, call: &CallExpr) -> Result<Value, RuntimeError> {
        let (start, end) = match call.args.as_slice() {
            [end] => (0i64, self.whole_number_arg(end)?),
            [start, end] => (self.whole_number_arg(start)?, self.whole_number_arg(end)?),
            args => {
                return Err(RuntimeError::ArityMismatch {
                    name: "range".to_string(),
                    expected: 1,
                    got: args.len(),
                    span: call.span,
                })
            }
        };

        let count = end.saturating_sub(start).max(0) as u64;
        if count > self.steps_remaining {
            return Err(RuntimeError::StepBudgetExceeded { span: call.span });
        }

        let items = (start..end.max(start))
            .map(|n| Value::Number(n as f64))
            .collect();
        Ok(Value::List(SharedList::new(items)))
    }

    /// Require exactly one argument
    fn single_arg<'a>(&self, call: &'a CallExpr) -> Result<&'a Expr, RuntimeError> {
        match call.args.as_slice() {
            [arg] => Ok(arg),
            args => Err(RuntimeError::ArityMismatch {
                name: call.callee.name.clone(),
                expected: 1,
                got: args.len(),
                span: call.span,
            }),
        }
    }

    /// Evaluate an argument that must be a whole number
    fn whole_number_arg(&mut self, expr: &Expr) -> Result<i64, RuntimeError> {
        let span = expr.span();
        match self.eval_expr(expr)? {
            Value::Number(n) if n.fract() == 0.0 && n.is_finite() => Ok(n as i64),
            other => Err(RuntimeError::TypeError {
                msg: format!("range() needs whole numbers, got {}", other.type_name()),
                span,
            }),
        }
    }
}
