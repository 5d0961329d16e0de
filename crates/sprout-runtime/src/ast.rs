//! Abstract syntax tree
//!
//! Tagged statement/expression nodes produced by the parser. Every node
//! carries a span back into the learner's snippet. Comparisons are not
//! first-class expressions in the teaching language: they appear only as
//! `if`/`elif` conditions, so they get their own `Condition` node.

use crate::span::Span;

/// A complete parsed snippet
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub items: Vec<Item>,
}

/// Top-level item: a function definition or a statement
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Function(FunctionDef),
    Statement(Stmt),
}

/// An identifier with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// A function definition (`def name(params):`)
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: Identifier,
    pub params: Vec<Identifier>,
    pub body: Block,
    pub span: Span,
}

/// An indented block of statements
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// A statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `name = expr`
    Assign(Assign),
    /// A bare call executed for its side effects
    Expr(ExprStmt),
    /// `if`/`elif`/`else` chain
    If(IfStmt),
    /// `for var in iterable:`
    For(ForStmt),
    /// `return` with optional value
    Return(ReturnStmt),
    /// `name.append(expr)` list mutation
    Append(AppendStmt),
}

impl Stmt {
    /// Get the span of this statement
    pub fn span(&self) -> Span {
        match self {
            Stmt::Assign(s) => s.span,
            Stmt::Expr(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Append(s) => s.span,
        }
    }
}

/// Assignment statement
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub name: Identifier,
    pub value: Expr,
    pub span: Span,
}

/// Expression statement (always a call in this grammar)
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

/// `if`/`elif` chain with optional `else`
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    /// The `if` branch followed by any `elif` branches, in order
    pub branches: Vec<CondBranch>,
    pub else_block: Option<Block>,
    pub span: Span,
}

/// One conditional branch (`if cond:` or `elif cond:`)
#[derive(Debug, Clone, PartialEq)]
pub struct CondBranch {
    pub cond: Condition,
    pub block: Block,
    pub span: Span,
}

/// `for var in iterable:` loop
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub var: Identifier,
    pub iterable: Expr,
    pub body: Block,
    pub span: Span,
}

/// `return` statement
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// `name.append(expr)` statement
#[derive(Debug, Clone, PartialEq)]
pub struct AppendStmt {
    pub target: Identifier,
    pub value: Expr,
    pub span: Span,
}

/// A comparison used as an `if`/`elif` condition
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub lhs: Expr,
    pub op: CompareOp,
    pub rhs: Expr,
    pub span: Span,
}

/// The six comparison operators of the safe comparator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

impl CompareOp {
    /// Source text of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
            CompareOp::Less => "<",
            CompareOp::LessEq => "<=",
            CompareOp::Greater => ">",
            CompareOp::GreaterEq => ">=",
        }
    }
}

/// An expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Number literal
    Number(f64, Span),
    /// String literal
    Str(String, Span),
    /// F-string with interpolation holes
    FString(FString),
    /// Variable reference
    Name(Identifier),
    /// List literal
    List(ListLiteral),
    /// Function call
    Call(CallExpr),
    /// Binary arithmetic
    Binary(BinaryExpr),
}

impl Expr {
    /// Get the span of this expression
    pub fn span(&self) -> Span {
        match self {
            Expr::Number(_, span) => *span,
            Expr::Str(_, span) => *span,
            Expr::FString(f) => f.span,
            Expr::Name(id) => id.span,
            Expr::List(l) => l.span,
            Expr::Call(c) => c.span,
            Expr::Binary(b) => b.span,
        }
    }
}

/// F-string literal split into text and interpolation segments
#[derive(Debug, Clone, PartialEq)]
pub struct FString {
    pub segments: Vec<FSegment>,
    pub span: Span,
}

/// One segment of an f-string
#[derive(Debug, Clone, PartialEq)]
pub enum FSegment {
    /// Literal text between holes
    Text(String),
    /// `{name}` interpolation hole
    Interp(Identifier),
}

/// List literal (`[1, "a", 2]`)
#[derive(Debug, Clone, PartialEq)]
pub struct ListLiteral {
    pub items: Vec<Expr>,
    pub span: Span,
}

/// Function call expression
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Identifier,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// Binary arithmetic expression
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub span: Span,
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Source text of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}
