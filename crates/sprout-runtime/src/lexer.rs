//! Lexical analysis (tokenization)
//!
//! The lexer converts a learner's snippet into a stream of tokens with span
//! information. The teaching language is layout-sensitive: block structure
//! comes from indentation, so the lexer maintains an indent stack and emits
//! `Newline`, `Indent`, and `Dedent` tokens the way the parser expects.
//! Blank lines and `#` comment lines never affect layout.

use crate::diagnostic::Diagnostic;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Columns a tab character advances at the start of a line
const TAB_WIDTH: usize = 4;

/// Lexer state for tokenizing source code
pub struct Lexer {
    /// Original source code
    source: String,
    /// Characters of source code
    chars: Vec<char>,
    /// Current position in chars
    current: usize,
    /// Current byte offset into the source (spans are byte ranges)
    byte_pos: usize,
    /// Current line number (1-indexed)
    line: u32,
    /// Start byte offset of current token
    start_pos: usize,
    /// Start line of current token
    start_line: u32,
    /// Open indentation levels; always holds at least the base level 0
    indent_stack: Vec<usize>,
    /// True when the next token begins a logical line
    at_line_start: bool,
    /// Collected diagnostics
    diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let chars: Vec<char> = source.chars().collect();
        Self {
            source,
            chars,
            current: 0,
            byte_pos: 0,
            line: 1,
            start_pos: 0,
            start_line: 1,
            indent_stack: vec![0],
            at_line_start: true,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the source code, returning tokens and any diagnostics
    pub fn tokenize(&mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();

        loop {
            if self.at_line_start {
                self.handle_line_start(&mut tokens);
            }
            self.skip_inline_trivia();
            if self.is_at_end() {
                break;
            }

            let token = self.next_token();
            if token.kind == TokenKind::Newline {
                self.at_line_start = true;
            }
            tokens.push(token);
        }

        // A final line without a trailing newline still ends a statement
        if matches!(
            tokens.last().map(|t| t.kind),
            Some(kind) if kind != TokenKind::Newline
        ) {
            let span = Span::new(self.byte_pos, self.byte_pos);
            tokens.push(Token::new(TokenKind::Newline, "", span));
        }

        // Close any blocks still open at end of buffer
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            let span = Span::new(self.byte_pos, self.byte_pos);
            tokens.push(Token::new(TokenKind::Dedent, "", span));
        }

        let span = Span::new(self.byte_pos, self.byte_pos);
        tokens.push(Token::new(TokenKind::Eof, "", span));

        (tokens, std::mem::take(&mut self.diagnostics))
    }

    /// Measure indentation at the start of a logical line and emit
    /// Indent/Dedent tokens. Blank and comment-only lines are consumed
    /// without affecting the indent stack.
    fn handle_line_start(&mut self, tokens: &mut Vec<Token>) {
        loop {
            let mut width = 0usize;
            while !self.is_at_end() {
                match self.peek() {
                    ' ' => {
                        self.advance();
                        width += 1;
                    }
                    '\t' => {
                        self.advance();
                        width += TAB_WIDTH - (width % TAB_WIDTH);
                    }
                    _ => break,
                }
            }

            if self.is_at_end() {
                return;
            }

            match self.peek() {
                '\n' => {
                    // Blank line
                    self.advance();
                    self.line += 1;
                }
                '\r' => {
                    self.advance();
                }
                '#' => {
                    // Comment-only line
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                }
                _ => {
                    self.start_pos = self.byte_pos;
                    self.start_line = self.line;

                    let top = *self.indent_stack.last().unwrap_or(&0);
                    if width > top {
                        self.indent_stack.push(width);
                        tokens.push(self.make_token(TokenKind::Indent, ""));
                    } else if width < top {
                        while *self.indent_stack.last().unwrap_or(&0) > width {
                            self.indent_stack.pop();
                            tokens.push(self.make_token(TokenKind::Dedent, ""));
                        }
                        if *self.indent_stack.last().unwrap_or(&0) != width {
                            tokens.push(self.error_token(
                                "Inconsistent indentation: line does not match any open block",
                            ));
                        }
                    }

                    self.at_line_start = false;
                    return;
                }
            }
        }
    }

    /// Skip spaces, tabs, and comments within a line (never newlines)
    fn skip_inline_trivia(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                ' ' | '\r' | '\t' => {
                    self.advance();
                }
                '#' => {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    /// Scan the next token (caller guarantees not at end)
    fn next_token(&mut self) -> Token {
        self.start_pos = self.byte_pos;
        self.start_line = self.line;

        let c = self.advance();

        match c {
            '\n' => {
                let token = self.make_token(TokenKind::Newline, "\n");
                self.line += 1;
                token
            }

            // Single-character tokens
            '(' => self.make_token(TokenKind::LeftParen, "("),
            ')' => self.make_token(TokenKind::RightParen, ")"),
            '[' => self.make_token(TokenKind::LeftBracket, "["),
            ']' => self.make_token(TokenKind::RightBracket, "]"),
            ',' => self.make_token(TokenKind::Comma, ","),
            ':' => self.make_token(TokenKind::Colon, ":"),
            '.' => self.make_token(TokenKind::Dot, "."),
            '+' => self.make_token(TokenKind::Plus, "+"),
            '-' => self.make_token(TokenKind::Minus, "-"),
            '*' => self.make_token(TokenKind::Star, "*"),
            '/' => self.make_token(TokenKind::Slash, "/"),

            // One- or two-character tokens
            '=' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::EqualEqual, "==")
                } else {
                    self.make_token(TokenKind::Equal, "=")
                }
            }
            '!' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::BangEqual, "!=")
                } else {
                    self.error_token("Unexpected character '!', did you mean '!='?")
                }
            }
            '<' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::LessEqual, "<=")
                } else {
                    self.make_token(TokenKind::Less, "<")
                }
            }
            '>' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::GreaterEqual, ">=")
                } else {
                    self.make_token(TokenKind::Greater, ">")
                }
            }

            // String and f-string literals
            '"' | '\'' => self.string(c),
            'f' if self.peek() == '"' || self.peek() == '\'' => {
                let quote = self.advance();
                self.string_body(quote, TokenKind::FString)
            }

            // Numbers
            c if c.is_ascii_digit() => self.number(),

            // Identifiers and keywords
            c if c.is_alphabetic() || c == '_' => self.identifier(),

            // Unexpected character
            _ => self.error_token(&format!("Unexpected character '{}'", c)),
        }
    }

    /// Scan a string literal opened with the given quote character
    fn string(&mut self, quote: char) -> Token {
        self.string_body(quote, TokenKind::Str)
    }

    /// Shared scanner for string and f-string bodies. Escapes are resolved;
    /// f-string braces are kept raw for the parser to split into segments.
    fn string_body(&mut self, quote: char, kind: TokenKind) -> Token {
        let mut value = String::new();

        while !self.is_at_end() && self.peek() != quote {
            if self.peek() == '\n' {
                return self.error_token("Unterminated string literal");
            }

            if self.peek() == '\\' {
                self.advance(); // consume backslash
                if self.is_at_end() {
                    return self.error_token("Unterminated string literal");
                }

                let escaped = match self.peek() {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    '\\' => '\\',
                    '"' => '"',
                    '\'' => '\'',
                    c => {
                        return self.error_token(&format!("Invalid escape sequence '\\{}'", c));
                    }
                };

                self.advance(); // consume escaped character
                value.push(escaped);
            } else {
                value.push(self.advance());
            }
        }

        if self.is_at_end() {
            return self.error_token("Unterminated string literal");
        }

        self.advance(); // Closing quote
        self.make_token(kind, &value)
    }

    /// Scan a number literal (integer or decimal)
    fn number(&mut self) -> Token {
        let start = self.current - 1; // -1 because we already advanced past first digit

        while !self.is_at_end() && self.peek().is_ascii_digit() {
            self.advance();
        }

        // Check for decimal point followed by a digit
        if !self.is_at_end() && self.peek() == '.' {
            if let Some(c) = self.peek_next() {
                if c.is_ascii_digit() {
                    self.advance(); // consume .

                    while !self.is_at_end() && self.peek().is_ascii_digit() {
                        self.advance();
                    }
                }
            }
        }

        let lexeme: String = self.chars[start..self.current].iter().collect();
        self.make_token(TokenKind::Number, &lexeme)
    }

    /// Scan an identifier or keyword
    fn identifier(&mut self) -> Token {
        let start = self.current - 1; // -1 because we already advanced past first char

        while !self.is_at_end() {
            let c = self.peek();
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let lexeme: String = self.chars[start..self.current].iter().collect();
        let kind = TokenKind::is_keyword(&lexeme).unwrap_or(TokenKind::Identifier);

        self.make_token(kind, &lexeme)
    }

    // === Character navigation ===

    /// Advance to next character and return it
    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        self.byte_pos += c.len_utf8();
        c
    }

    /// Peek at current character without advancing
    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.current]
        }
    }

    /// Peek at next character (current + 1)
    fn peek_next(&self) -> Option<char> {
        if self.current + 1 >= self.chars.len() {
            None
        } else {
            Some(self.chars[self.current + 1])
        }
    }

    /// Check if current character matches expected, and advance if so
    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.chars[self.current] != expected {
            false
        } else {
            self.advance();
            true
        }
    }

    /// Check if we've reached the end of source
    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    // === Token creation ===

    /// Create a token with the given kind and lexeme
    fn make_token(&self, kind: TokenKind, lexeme: &str) -> Token {
        let span = Span {
            start: self.start_pos,
            end: self.byte_pos,
        };

        Token {
            kind,
            lexeme: lexeme.to_string(),
            span,
        }
    }

    /// Create an error token and record a diagnostic
    fn error_token(&mut self, message: &str) -> Token {
        let span = Span {
            start: self.start_pos,
            end: self.byte_pos.max(self.start_pos + 1),
        };

        let snippet = self.get_line_snippet(self.start_line);

        self.diagnostics.push(
            Diagnostic::error_with_code("SP1000", message, span)
                .with_line(self.start_line as usize)
                .with_snippet(snippet)
                .with_label("lexer error"),
        );

        Token {
            kind: TokenKind::Error,
            lexeme: message.to_string(),
            span,
        }
    }

    /// Get the source line for a given line number
    fn get_line_snippet(&self, line: u32) -> String {
        self.source
            .lines()
            .nth((line - 1) as usize)
            .unwrap_or("")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let (tokens, _) = lexer.tokenize();
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_input() {
        let mut lexer = Lexer::new("");
        let (tokens, diagnostics) = lexer.tokenize();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!(diagnostics.len(), 0);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let mut lexer = Lexer::new("def greet for item in stuff");
        let (tokens, _) = lexer.tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Def);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].lexeme, "greet");
        assert_eq!(tokens[2].kind, TokenKind::For);
        assert_eq!(tokens[3].kind, TokenKind::Identifier);
        assert_eq!(tokens[4].kind, TokenKind::In);
        assert_eq!(tokens[5].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("+ - * / == != < <= > >= ="),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::EqualEqual,
                TokenKind::BangEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Equal,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let mut lexer = Lexer::new("42 3.14 0");
        let (tokens, _) = lexer.tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "42");
        assert_eq!(tokens[1].kind, TokenKind::Number);
        assert_eq!(tokens[1].lexeme, "3.14");
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].lexeme, "0");
    }

    #[test]
    fn test_string_literals_both_quotes() {
        let mut lexer = Lexer::new(r#""hello" 'world'"#);
        let (tokens, diagnostics) = lexer.tokenize();

        assert!(diagnostics.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].lexeme, "hello");
        assert_eq!(tokens[1].kind, TokenKind::Str);
        assert_eq!(tokens[1].lexeme, "world");
    }

    #[test]
    fn test_string_escapes() {
        let mut lexer = Lexer::new(r#""a\nb\tc""#);
        let (tokens, _) = lexer.tokenize();
        assert_eq!(tokens[0].lexeme, "a\nb\tc");
    }

    #[test]
    fn test_fstring() {
        let mut lexer = Lexer::new(r#"f"Hello, {name}!""#);
        let (tokens, diagnostics) = lexer.tokenize();

        assert!(diagnostics.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::FString);
        assert_eq!(tokens[0].lexeme, "Hello, {name}!");
    }

    #[test]
    fn test_f_identifier_is_not_fstring() {
        let mut lexer = Lexer::new("f = 1");
        let (tokens, _) = lexer.tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "f");
    }

    #[test]
    fn test_indent_dedent() {
        let source = "def greet():\n    print('hi')\ngreet()\n";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Def,
                TokenKind::Identifier,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Identifier,
                TokenKind::LeftParen,
                TokenKind::Str,
                TokenKind::RightParen,
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Identifier,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_blank_and_comment_lines_ignore_layout() {
        let source = "def f():\n\n# note at column zero\n    return 1\n";
        let kinds = kinds(source);
        // No Dedent before the body: blank/comment lines don't close blocks
        assert_eq!(
            kinds,
            vec![
                TokenKind::Def,
                TokenKind::Identifier,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Return,
                TokenKind::Number,
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_dedents_closed_at_eof() {
        let source = "def f():\n    if 1 == 1:\n        return 2";
        let kinds = kinds(source);
        let dedents = kinds.iter().filter(|k| **k == TokenKind::Dedent).count();
        assert_eq!(dedents, 2);
        assert_eq!(*kinds.last().unwrap(), TokenKind::Eof);
    }

    #[test]
    fn test_inconsistent_indentation() {
        let source = "def f():\n        return 1\n    return 2\n";
        let mut lexer = Lexer::new(source);
        let (_, diagnostics) = lexer.tokenize();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("Inconsistent indentation"));
    }

    #[test]
    fn test_inline_comment() {
        let source = "x = 5  # five\n";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::Number,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("print(\"oops\n");
        let (tokens, diagnostics) = lexer.tokenize();
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Error));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("Unterminated"));
    }

    #[test]
    fn test_missing_trailing_newline_is_synthesized() {
        let kinds = kinds("greet()");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        // The multi-byte character shifts byte offsets past char indices
        let source = "name = '💚'\nprint(name)\n";
        let mut lexer = Lexer::new(source);
        let (tokens, diagnostics) = lexer.tokenize();
        assert!(diagnostics.is_empty());

        let print = tokens
            .iter()
            .find(|t| t.lexeme == "print")
            .expect("print token");
        assert_eq!(&source[print.span.start..print.span.end], "print");
    }

    #[test]
    fn test_bare_bang_is_error() {
        let mut lexer = Lexer::new("!");
        let (tokens, diagnostics) = lexer.tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(diagnostics.len(), 1);
    }
}
