//! Parsing (tokens to AST)
//!
//! Recursive-descent parser over the layout-aware token stream. Blocks are
//! delimited by Indent/Dedent tokens, statements by Newline tokens.
//! Comparisons are only accepted as `if`/`elif` conditions; arithmetic uses
//! standard term/factor precedence.

use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Parser state for building an AST from tokens
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    /// Nesting depth of function bodies (return is rejected at depth 0)
    fn_depth: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    /// Create a new parser for the given tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            fn_depth: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Parse tokens into an AST
    pub fn parse(&mut self) -> (Program, Vec<Diagnostic>) {
        let mut items = Vec::new();

        while !self.is_at_end() {
            if self.match_token(TokenKind::Newline) {
                continue;
            }
            if self.check(TokenKind::Dedent) {
                // Leftover from error recovery inside a block
                self.advance();
                continue;
            }

            let result = if self.check(TokenKind::Def) {
                self.parse_function().map(Item::Function)
            } else {
                self.parse_statement().map(Item::Statement)
            };

            match result {
                Ok(item) => items.push(item),
                Err(()) => self.synchronize(),
            }
        }

        (Program { items }, std::mem::take(&mut self.diagnostics))
    }

    // === Top-level parsing ===

    /// Parse a function definition
    fn parse_function(&mut self) -> Result<FunctionDef, ()> {
        let def_token = self.consume(TokenKind::Def, "Expected 'def'")?;

        let name_token = self.consume_identifier("a function name")?;
        let name = Identifier {
            name: name_token.lexeme.clone(),
            span: name_token.span,
        };

        self.consume(TokenKind::LeftParen, "Expected '(' after function name")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let param = self.consume_identifier("a parameter name")?;
                params.push(Identifier {
                    name: param.lexeme.clone(),
                    span: param.span,
                });

                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenKind::RightParen, "Expected ')' after parameters")?;

        self.fn_depth += 1;
        let body = self.parse_block();
        self.fn_depth -= 1;
        let body = body?;

        Ok(FunctionDef {
            name,
            params,
            span: def_token.span.merge(body.span),
            body,
        })
    }

    /// Parse an indented block introduced by ':'
    fn parse_block(&mut self) -> Result<Block, ()> {
        let colon = self.consume(TokenKind::Colon, "Expected ':' before an indented block")?;
        self.consume(TokenKind::Newline, "Expected a newline after ':'")?;
        self.consume(TokenKind::Indent, "Expected an indented block")?;

        let mut stmts = Vec::new();
        while !self.check(TokenKind::Dedent) && !self.is_at_end() {
            if self.match_token(TokenKind::Newline) {
                continue;
            }
            match self.parse_statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(()) => self.synchronize(),
            }
        }

        if self.check(TokenKind::Dedent) {
            self.advance();
        }

        // Statements after a return in the same block can never run
        if let Some(pos) = stmts.iter().position(|s| matches!(s, Stmt::Return(_))) {
            if pos + 1 < stmts.len() {
                self.warning("Unreachable code after 'return'", stmts[pos + 1].span());
            }
        }

        let end_span = stmts.last().map_or(colon.span, |s| s.span());

        Ok(Block {
            stmts,
            span: colon.span.merge(end_span),
        })
    }

    // === Statement parsing ===

    /// Parse a statement
    fn parse_statement(&mut self) -> Result<Stmt, ()> {
        match self.peek().kind {
            TokenKind::Return => self.parse_return(),
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::Identifier => self.parse_identifier_statement(),
            TokenKind::Def => {
                self.error("Function definitions are only allowed at the top level");
                Err(())
            }
            TokenKind::Elif => {
                self.error("'elif' without a matching 'if'");
                Err(())
            }
            TokenKind::Else => {
                self.error("'else' without a matching 'if'");
                Err(())
            }
            kind => {
                self.error(&format!("Expected a statement, found '{}'", kind.as_str()));
                Err(())
            }
        }
    }

    /// Parse a return statement
    fn parse_return(&mut self) -> Result<Stmt, ()> {
        let return_token = self.consume(TokenKind::Return, "Expected 'return'")?;

        if self.fn_depth == 0 {
            self.error("'return' outside of a function");
            return Err(());
        }

        let value = if self.check(TokenKind::Newline) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let end = self.consume(TokenKind::Newline, "Expected a newline after 'return'")?;

        Ok(Stmt::Return(ReturnStmt {
            value,
            span: return_token.span.merge(end.span),
        }))
    }

    /// Parse an if/elif/else chain
    fn parse_if(&mut self) -> Result<Stmt, ()> {
        let if_token = self.consume(TokenKind::If, "Expected 'if'")?;
        let cond = self.parse_condition()?;
        let block = self.parse_block()?;

        let mut branches = vec![CondBranch {
            span: if_token.span.merge(block.span),
            cond,
            block,
        }];

        while self.check(TokenKind::Elif) {
            let elif_token = self.advance();
            let cond = self.parse_condition()?;
            let block = self.parse_block()?;
            branches.push(CondBranch {
                span: elif_token.span.merge(block.span),
                cond,
                block,
            });
        }

        let else_block = if self.match_token(TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };

        let end_span = else_block
            .as_ref()
            .map_or(branches.last().map_or(if_token.span, |b| b.span), |b| b.span);

        Ok(Stmt::If(IfStmt {
            branches,
            else_block,
            span: if_token.span.merge(end_span),
        }))
    }

    /// Parse a for loop
    fn parse_for(&mut self) -> Result<Stmt, ()> {
        let for_token = self.consume(TokenKind::For, "Expected 'for'")?;

        let var_token = self.consume_identifier("a loop variable")?;
        let var = Identifier {
            name: var_token.lexeme.clone(),
            span: var_token.span,
        };

        self.consume(TokenKind::In, "Expected 'in' after the loop variable")?;
        let iterable = self.parse_expression()?;
        let body = self.parse_block()?;

        Ok(Stmt::For(ForStmt {
            var,
            iterable,
            span: for_token.span.merge(body.span),
            body,
        }))
    }

    /// Parse a statement starting with an identifier: assignment, append,
    /// or a bare call
    fn parse_identifier_statement(&mut self) -> Result<Stmt, ()> {
        match self.peek_next().kind {
            TokenKind::Equal => {
                let name_token = self.advance();
                self.advance(); // '='

                let value = self.parse_expression()?;
                let end = self.consume(TokenKind::Newline, "Expected a newline after assignment")?;

                Ok(Stmt::Assign(Assign {
                    name: Identifier {
                        name: name_token.lexeme.clone(),
                        span: name_token.span,
                    },
                    value,
                    span: name_token.span.merge(end.span),
                }))
            }
            TokenKind::Dot => {
                let name_token = self.advance();
                self.advance(); // '.'

                let method = self.consume_identifier("a method name")?;
                if method.lexeme != "append" {
                    self.error(&format!("Unknown method '{}'", method.lexeme));
                    return Err(());
                }

                self.consume(TokenKind::LeftParen, "Expected '(' after 'append'")?;
                let value = self.parse_expression()?;
                self.consume(TokenKind::RightParen, "Expected ')' after the append argument")?;
                let end = self.consume(TokenKind::Newline, "Expected a newline after 'append'")?;

                Ok(Stmt::Append(AppendStmt {
                    target: Identifier {
                        name: name_token.lexeme.clone(),
                        span: name_token.span,
                    },
                    value,
                    span: name_token.span.merge(end.span),
                }))
            }
            _ => {
                let expr = self.parse_expression()?;
                if !matches!(expr, Expr::Call(_)) {
                    self.error("Expected a statement; only function calls can stand alone");
                    return Err(());
                }

                let end = self.consume(TokenKind::Newline, "Expected a newline after the call")?;
                Ok(Stmt::Expr(ExprStmt {
                    span: expr.span().merge(end.span),
                    expr,
                }))
            }
        }
    }

    /// Parse a condition: `<expr> <comparison> <expr>`
    fn parse_condition(&mut self) -> Result<Condition, ()> {
        let lhs = self.parse_expression()?;

        let op = match self.peek().kind {
            TokenKind::EqualEqual => CompareOp::Eq,
            TokenKind::BangEqual => CompareOp::NotEq,
            TokenKind::Less => CompareOp::Less,
            TokenKind::LessEqual => CompareOp::LessEq,
            TokenKind::Greater => CompareOp::Greater,
            TokenKind::GreaterEqual => CompareOp::GreaterEq,
            _ => {
                self.error("Expected a comparison operator in the condition");
                return Err(());
            }
        };
        self.advance();

        let rhs = self.parse_expression()?;

        Ok(Condition {
            span: lhs.span().merge(rhs.span()),
            lhs,
            op,
            rhs,
        })
    }

    // === Expression parsing ===

    /// Parse an expression (additive precedence level)
    fn parse_expression(&mut self) -> Result<Expr, ()> {
        let mut expr = self.parse_term()?;

        while matches!(self.peek().kind, TokenKind::Plus | TokenKind::Minus) {
            let op = if self.advance().kind == TokenKind::Plus {
                BinaryOp::Add
            } else {
                BinaryOp::Sub
            };
            let rhs = self.parse_term()?;
            let span = expr.span().merge(rhs.span());
            expr = Expr::Binary(BinaryExpr {
                op,
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
                span,
            });
        }

        Ok(expr)
    }

    /// Parse a term (multiplicative precedence level)
    fn parse_term(&mut self) -> Result<Expr, ()> {
        let mut expr = self.parse_primary()?;

        while matches!(self.peek().kind, TokenKind::Star | TokenKind::Slash) {
            let op = if self.advance().kind == TokenKind::Star {
                BinaryOp::Mul
            } else {
                BinaryOp::Div
            };
            let rhs = self.parse_primary()?;
            let span = expr.span().merge(rhs.span());
            expr = Expr::Binary(BinaryExpr {
                op,
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
                span,
            });
        }

        Ok(expr)
    }

    /// Parse a primary expression
    fn parse_primary(&mut self) -> Result<Expr, ()> {
        match self.peek().kind {
            TokenKind::Number => {
                let token = self.advance();
                match token.lexeme.parse::<f64>() {
                    Ok(n) => Ok(Expr::Number(n, token.span)),
                    Err(_) => {
                        self.error("Invalid number literal");
                        Err(())
                    }
                }
            }
            TokenKind::Minus => {
                let minus = self.advance();
                let token = self.consume(TokenKind::Number, "Expected a number after '-'")?;
                match token.lexeme.parse::<f64>() {
                    Ok(n) => Ok(Expr::Number(-n, minus.span.merge(token.span))),
                    Err(_) => {
                        self.error("Invalid number literal");
                        Err(())
                    }
                }
            }
            TokenKind::Str => {
                let token = self.advance();
                Ok(Expr::Str(token.lexeme, token.span))
            }
            TokenKind::FString => {
                let token = self.advance();
                self.parse_fstring(&token)
            }
            TokenKind::Identifier => {
                let token = self.advance();
                if self.check(TokenKind::LeftParen) {
                    self.parse_call(token)
                } else {
                    Ok(Expr::Name(Identifier {
                        name: token.lexeme,
                        span: token.span,
                    }))
                }
            }
            TokenKind::LeftBracket => self.parse_list(),
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.consume(TokenKind::RightParen, "Expected ')' after the expression")?;
                Ok(expr)
            }
            kind => {
                self.error(&format!("Expected an expression, found '{}'", kind.as_str()));
                Err(())
            }
        }
    }

    /// Parse a call expression (callee token already consumed)
    fn parse_call(&mut self, callee: Token) -> Result<Expr, ()> {
        self.consume(TokenKind::LeftParen, "Expected '('")?;

        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        let end = self.consume(TokenKind::RightParen, "Expected ')' after arguments")?;

        Ok(Expr::Call(CallExpr {
            callee: Identifier {
                name: callee.lexeme,
                span: callee.span,
            },
            args,
            span: callee.span.merge(end.span),
        }))
    }

    /// Parse a list literal
    fn parse_list(&mut self) -> Result<Expr, ()> {
        let open = self.consume(TokenKind::LeftBracket, "Expected '['")?;

        let mut items = Vec::new();
        if !self.check(TokenKind::RightBracket) {
            loop {
                items.push(self.parse_expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        let end = self.consume(TokenKind::RightBracket, "Expected ']' after list items")?;

        Ok(Expr::List(ListLiteral {
            items,
            span: open.span.merge(end.span),
        }))
    }

    /// Split an f-string token into text and interpolation segments
    fn parse_fstring(&mut self, token: &Token) -> Result<Expr, ()> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = token.lexeme.chars();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }

                    if !closed {
                        self.error_at(token, "Unclosed '{' in f-string");
                        return Err(());
                    }
                    if !is_identifier(&name) {
                        self.error_at(
                            token,
                            &format!("Invalid f-string placeholder '{{{}}}'", name),
                        );
                        return Err(());
                    }

                    if !text.is_empty() {
                        segments.push(FSegment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(FSegment::Interp(Identifier {
                        name,
                        span: token.span,
                    }));
                }
                '}' => {
                    self.error_at(token, "Unmatched '}' in f-string");
                    return Err(());
                }
                _ => text.push(c),
            }
        }

        if !text.is_empty() {
            segments.push(FSegment::Text(text));
        }

        Ok(Expr::FString(FString {
            segments,
            span: token.span,
        }))
    }

    // === Helpers ===

    /// Peek at the current token
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Peek at the token after the current one
    fn peek_next(&self) -> &Token {
        self.tokens
            .get(self.current + 1)
            .unwrap_or_else(|| self.tokens.last().expect("token stream ends with EOF"))
    }

    /// Advance past the current token and return it
    fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    /// Check the current token's kind without advancing
    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Advance if the current token matches the expected kind
    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of the expected kind, or record an error
    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token, ()> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            self.error(message);
            Err(())
        }
    }

    /// Consume an identifier token, or record an error
    fn consume_identifier(&mut self, what: &str) -> Result<Token, ()> {
        if self.check(TokenKind::Identifier) {
            Ok(self.advance())
        } else {
            self.error(&format!("Expected {}", what));
            Err(())
        }
    }

    /// Check if we've reached the end of the token stream
    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Record a parse error at the current token
    fn error(&mut self, message: &str) {
        let span = self.peek().span;
        self.diagnostics.push(
            Diagnostic::error_with_code("SP2000", message, span).with_label("parse error"),
        );
    }

    /// Record an advisory warning at the given span
    fn warning(&mut self, message: &str, span: Span) {
        self.diagnostics.push(
            Diagnostic::warning_with_code("SP2001", message, span).with_label("warning"),
        );
    }

    /// Record a parse error at a specific token
    fn error_at(&mut self, token: &Token, message: &str) {
        self.diagnostics.push(
            Diagnostic::error_with_code("SP2000", message, token.span).with_label("parse error"),
        );
    }

    /// Skip to the next statement boundary after a parse error
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            match self.peek().kind {
                TokenKind::Newline => {
                    self.advance();
                    return;
                }
                TokenKind::Dedent => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}

/// True if the string is a valid identifier (f-string placeholder check)
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
