//! Sprout Runtime - Snippet interpreter for the teaching language
//!
//! This library provides the complete snippet pipeline:
//! - Lexical analysis (indentation-aware) and parsing
//! - Capability gating per lesson tier
//! - Tree-walking interpretation with a step budget
//! - Heuristic concept detection for challenge checklists

/// Sprout runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod ast;
pub mod capabilities;
pub mod concepts;
pub mod diagnostic;
pub mod engine;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;
pub mod value;

// Re-export commonly used types
pub use capabilities::Capabilities;
pub use concepts::{Concept, ConceptSet};
pub use diagnostic::{Diagnostic, DiagnosticLevel};
pub use engine::{Engine, RunReport, SnippetError, USER_ERROR_MESSAGE};
pub use interpreter::{Interpreter, DEFAULT_STEP_BUDGET};
pub use lexer::Lexer;
pub use parser::Parser;
pub use span::Span;
pub use token::{Token, TokenKind};
pub use value::{RuntimeError, SharedList, Value};
