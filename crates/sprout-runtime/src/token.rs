//! Token types for lexical analysis
//!
//! Defines all token types recognized by the Sprout lexer. The teaching
//! language is layout-sensitive, so the stream carries explicit `Newline`,
//! `Indent`, and `Dedent` tokens alongside the usual kinds.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The source text of this token (escapes resolved for string kinds)
    pub lexeme: String,
    /// Source location
    pub span: Span,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }
}

/// Classification of token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    /// Number literal (42, 3.14)
    Number,
    /// String literal ("hello" or 'hello')
    Str,
    /// F-string literal (f"Hi {name}"); lexeme is the raw inner text
    FString,
    /// Identifier
    Identifier,

    // Keywords
    /// `def` keyword (function definition)
    Def,
    /// `return` keyword
    Return,
    /// `if` keyword
    If,
    /// `elif` keyword
    Elif,
    /// `else` keyword
    Else,
    /// `for` keyword
    For,
    /// `in` keyword
    In,

    // Operators
    /// `+` (addition / string concatenation)
    Plus,
    /// `-` (subtraction)
    Minus,
    /// `*` (multiplication)
    Star,
    /// `/` (division)
    Slash,
    /// `==` (equality)
    EqualEqual,
    /// `!=` (inequality)
    BangEqual,
    /// `<` (less than)
    Less,
    /// `<=` (less than or equal)
    LessEqual,
    /// `>` (greater than)
    Greater,
    /// `>=` (greater than or equal)
    GreaterEqual,

    // Punctuation
    /// `=` (assignment)
    Equal,
    /// `(` (left parenthesis)
    LeftParen,
    /// `)` (right parenthesis)
    RightParen,
    /// `[` (left bracket)
    LeftBracket,
    /// `]` (right bracket)
    RightBracket,
    /// `,` (comma)
    Comma,
    /// `:` (colon)
    Colon,
    /// `.` (member access, `.append` only)
    Dot,

    // Layout
    /// End of a logical line
    Newline,
    /// Indentation increased (block opens)
    Indent,
    /// Indentation decreased (block closes)
    Dedent,

    // Special
    /// End of file
    Eof,
    /// Lexer error
    Error,
}

impl TokenKind {
    /// Check if a string is a keyword and return its token kind
    pub fn is_keyword(s: &str) -> Option<TokenKind> {
        match s {
            "def" => Some(TokenKind::Def),
            "return" => Some(TokenKind::Return),
            "if" => Some(TokenKind::If),
            "elif" => Some(TokenKind::Elif),
            "else" => Some(TokenKind::Else),
            "for" => Some(TokenKind::For),
            "in" => Some(TokenKind::In),
            _ => None,
        }
    }

    /// Get the string representation of this token kind
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::Str => "string",
            TokenKind::FString => "f-string",
            TokenKind::Identifier => "identifier",
            TokenKind::Def => "def",
            TokenKind::Return => "return",
            TokenKind::If => "if",
            TokenKind::Elif => "elif",
            TokenKind::Else => "else",
            TokenKind::For => "for",
            TokenKind::In => "in",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::EqualEqual => "==",
            TokenKind::BangEqual => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Equal => "=",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Newline => "newline",
            TokenKind::Indent => "indent",
            TokenKind::Dedent => "dedent",
            TokenKind::Eof => "EOF",
            TokenKind::Error => "error",
        }
    }

    /// True for the six comparison operators allowed in conditions
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            TokenKind::EqualEqual
                | TokenKind::BangEqual
                | TokenKind::Less
                | TokenKind::LessEqual
                | TokenKind::Greater
                | TokenKind::GreaterEqual
        )
    }
}
