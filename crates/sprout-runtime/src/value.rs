//! Runtime value representation
//!
//! - Numbers: IEEE 754 doubles, printed without a fractional part when whole
//! - Strings: heap-allocated, reference-counted, immutable
//! - Lists: reference semantics (SharedList) — `.append` through any binding
//!   is visible to every other binding of the same list, which is how list
//!   arguments mutated inside a function propagate back to the caller
//! - None: the absent value produced by functions without a return

use crate::span::Span;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Nested list rendering cuts off past this depth (self-referential lists)
const MAX_REPR_DEPTH: usize = 8;

/// Nested list comparison cuts off past this depth; beyond it two distinct
/// lists count as unequal (self-referential lists)
const MAX_EQ_DEPTH: usize = 8;

/// Shared, mutable list value.
///
/// All clones point at the same underlying storage; mutation through any
/// clone is visible to all others. This is the intentional escape from the
/// otherwise value-semantics world: the teaching language specifies that
/// appending to a list parameter inside a function mutates the caller's list.
#[derive(Debug, Clone)]
pub struct SharedList(Arc<Mutex<Vec<Value>>>);

impl SharedList {
    /// Create a list from its initial items
    pub fn new(items: Vec<Value>) -> Self {
        SharedList(Arc::new(Mutex::new(items)))
    }

    /// Acquire the lock and apply a read function
    pub fn with<R>(&self, f: impl FnOnce(&Vec<Value>) -> R) -> R {
        let guard = self.0.lock().expect("SharedList lock poisoned");
        f(&guard)
    }

    /// Acquire the lock and apply a mutation function
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Vec<Value>) -> R) -> R {
        let mut guard = self.0.lock().expect("SharedList lock poisoned");
        f(&mut guard)
    }

    /// Append a value
    pub fn push(&self, value: Value) {
        self.with_mut(|items| items.push(value));
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.with(|items| items.len())
    }

    /// True if the list holds no items
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clone the items out for iteration, releasing the lock before any
    /// loop body runs
    pub fn snapshot(&self) -> Vec<Value> {
        self.with(|items| items.clone())
    }

    /// True if both handles point at the same underlying list
    pub fn ptr_eq(&self, other: &SharedList) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn eq_depth(&self, other: &SharedList, depth: usize) -> bool {
        // Same allocation compares equal without touching the lock twice
        if self.ptr_eq(other) {
            return true;
        }
        if depth >= MAX_EQ_DEPTH {
            return false;
        }

        let a = self.snapshot();
        let b = other.snapshot();
        a.len() == b.len()
            && a.iter()
                .zip(b.iter())
                .all(|(x, y)| x.eq_depth(y, depth + 1))
    }
}

impl PartialEq for SharedList {
    fn eq(&self, other: &Self) -> bool {
        self.eq_depth(other, 0)
    }
}

impl FromIterator<Value> for SharedList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        SharedList::new(iter.into_iter().collect())
    }
}

/// Runtime value type
#[derive(Debug, Clone)]
pub enum Value {
    /// Numeric value (IEEE 754 double-precision)
    Number(f64),
    /// String value (reference-counted, immutable)
    Str(Arc<str>),
    /// List value (reference semantics)
    List(SharedList),
    /// Absent value
    None,
}

impl Value {
    /// Create a string value
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(s.as_ref()))
    }

    /// Create a list value
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(SharedList::new(items))
    }

    /// Human name of the value's type, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::None => "None",
        }
    }

    /// Quoted rendering used inside list displays: strings get quotes,
    /// everything else renders as it would at top level
    pub fn repr(&self) -> String {
        self.repr_depth(0)
    }

    fn repr_depth(&self, depth: usize) -> String {
        match self {
            Value::Str(s) => format!("'{}'", s),
            Value::List(list) => {
                if depth >= MAX_REPR_DEPTH {
                    return "[...]".to_string();
                }
                let items: Vec<String> = list
                    .snapshot()
                    .iter()
                    .map(|v| v.repr_depth(depth + 1))
                    .collect();
                format!("[{}]", items.join(", "))
            }
            other => other.to_string(),
        }
    }
}

impl Value {
    fn eq_depth(&self, other: &Value, depth: usize) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a.eq_depth(b, depth),
            (Value::None, Value::None) => true,
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.eq_depth(other, 0)
    }
}

// Display is small but load-bearing: print() output goes through it, so the
// formatting rules here are learner-visible behavior.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", Value::format_number(*n)),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(_) => write!(f, "{}", self.repr()),
            Value::None => write!(f, "None"),
        }
    }
}

impl Value {
    /// Render a number the way print() shows it: whole values without a
    /// fractional part, everything else with the host float formatting
    pub fn format_number(n: f64) -> String {
        if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
            format!("{}", n as i64)
        } else {
            format!("{}", n)
        }
    }
}

/// Runtime error raised during snippet execution.
///
/// These are internal: the engine collapses every variant into the single
/// learner-facing message at the run boundary. The enum exists so tests and
/// tooling can see what actually went wrong.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("type error: {msg}")]
    TypeError { msg: String, span: Span },

    #[error("unknown variable '{name}'")]
    UndefinedVariable { name: String, span: Span },

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String, span: Span },

    #[error("{name}() takes {expected} argument(s) but {got} were given")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
        span: Span,
    },

    #[error("execution step budget exceeded")]
    StepBudgetExceeded { span: Span },

    #[error("call depth limit exceeded")]
    RecursionLimit { span: Span },
}

impl RuntimeError {
    /// The span this error points at
    pub fn span(&self) -> Span {
        match self {
            RuntimeError::TypeError { span, .. }
            | RuntimeError::UndefinedVariable { span, .. }
            | RuntimeError::UnknownFunction { span, .. }
            | RuntimeError::ArityMismatch { span, .. }
            | RuntimeError::StepBudgetExceeded { span }
            | RuntimeError::RecursionLimit { span } => *span,
        }
    }
}
