//! # Parser Module
//!
//! Recursive-descent consumer of the lexer's token sequence. Builds the statement tree described by
//! [`crate::vellum::ast`] from the grammar this crate implements, one token of lookahead at a time —
//! the same cursor shape (`peek`/`check`/`advance`/`consume`) the lexer itself uses.
//!
//! Like the lexer, the parser never panics and never aborts the whole translation unit over one bad
//! statement: a recoverable error is reported through the injected [`ErrorSink`] and followed by
//! [`Parser::synchronize`], which discards tokens until a statement boundary so the rest of the module
//! still gets parsed (and diagnosed) instead of being swallowed by the first mistake.

use crate::vellum::ast::{Block, Statement};
use crate::vellum::lexer::{Token, TokenType};
use crate::vellum::sink::{DiagnosticKind, ErrorSink, Position};
use crate::vellum::typechecker::{builtin_to_c, BuiltinType};

fn is_builtin_type_token(kind: TokenType) -> bool {
    matches!(
        kind,
        TokenType::Void
            | TokenType::U8
            | TokenType::U16
            | TokenType::U32
            | TokenType::U64
            | TokenType::I8
            | TokenType::I16
            | TokenType::I32
            | TokenType::I64
            | TokenType::F64
            | TokenType::Bool
            | TokenType::Char
    )
}

/// Recursive-descent parser over a borrowed token slice.
pub struct Parser<'a, 'b> {
    tokens: &'b [Token<'a>],
    current: usize,
}

impl<'a, 'b> Parser<'a, 'b> {
    /// Builds a parser over `tokens`, starting at the first one.
    pub fn new(tokens: &'b [Token<'a>]) -> Self {
        Self { tokens, current: 0 }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.current)
    }

    fn peek_kind(&self) -> Option<TokenType> {
        self.peek().map(|t| t.kind)
    }

    fn peek_at(&self, offset: usize) -> Option<TokenType> {
        self.tokens.get(self.current + offset).map(|t| t.kind)
    }

    fn previous_kind(&self) -> Option<TokenType> {
        if self.current == 0 {
            None
        } else {
            self.tokens.get(self.current - 1).map(|t| t.kind)
        }
    }

    fn check(&self, kind: TokenType) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn match_token(&mut self, kinds: &[TokenType]) -> bool {
        match self.peek_kind() {
            Some(kind) if kinds.contains(&kind) => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn advance(&mut self) -> Option<Token<'a>> {
        if self.is_at_end() {
            return None;
        }
        let tok = self.tokens[self.current].clone();
        self.current += 1;
        Some(tok)
    }

    fn eof_position(&self) -> Position {
        self.tokens
            .last()
            .map(|t| Position::at(t.position.end))
            .unwrap_or_else(|| Position::at(0))
    }

    fn consume<S: ErrorSink>(
        &mut self,
        kind: TokenType,
        sink: &mut S,
        message: &str,
    ) -> Option<Token<'a>> {
        if self.check(kind) {
            self.advance()
        } else {
            let pos = self.peek().map(|t| t.position).unwrap_or_else(|| self.eof_position());
            sink.report(DiagnosticKind::Parse, pos, message.to_string());
            None
        }
    }

    /// Accumulates raw token text (joined with single spaces) until an un-nested token whose kind is
    /// in `stop_kinds` is reached; `(`/`[` increase nesting depth and `)`/`]` decrease it, so a
    /// stop-kind token nested inside a call or index expression is consumed rather than treated as the
    /// boundary. The stopping token itself is left unconsumed for the caller.
    fn capture_raw_until(&mut self, stop_kinds: &[TokenType]) -> String {
        let mut depth: i32 = 0;
        let mut parts = Vec::new();

        while let Some(kind) = self.peek_kind() {
            if depth == 0 && stop_kinds.contains(&kind) {
                break;
            }
            match kind {
                TokenType::LeftParen | TokenType::LeftBracket => depth += 1,
                TokenType::RightParen | TokenType::RightBracket => depth -= 1,
                _ => {}
            }
            let tok = self.advance().expect("peeked Some above");
            parts.push(tok.lexeme.to_string());
        }

        parts.join(" ")
    }

    /// Discards tokens until a statement/declaration boundary: the token right after a `;`, or the
    /// start of a recognized keyword. Always advances at least one token first, so a run of
    /// recoverable errors cannot loop forever even if the very next token is itself a boundary.
    fn synchronize(&mut self) {
        if self.advance().is_none() {
            return;
        }

        while !self.is_at_end() {
            if self.previous_kind() == Some(TokenType::Semicolon) {
                return;
            }

            match self.peek_kind() {
                Some(TokenType::RightBrace) => return,
                Some(TokenType::If) => return,
                Some(TokenType::While) => return,
                Some(TokenType::For) => return,
                Some(TokenType::Return) => return,
                Some(TokenType::Identifier) => return,
                Some(kind) if is_builtin_type_token(kind) => return,
                _ => {}
            }

            self.advance();
        }
    }

    fn parse_type_spec<S: ErrorSink>(&mut self, sink: &mut S) -> Option<(BuiltinType, String)> {
        let tok = match self.advance() {
            Some(tok) => tok,
            None => {
                sink.report(DiagnosticKind::Parse, self.eof_position(), "expected a type");
                return None;
            }
        };

        let ty = match BuiltinType::from_source_name(tok.lexeme) {
            Some(ty) => ty,
            None => {
                sink.report(
                    DiagnosticKind::Parse,
                    tok.position,
                    format!("expected a type, found '{}'", tok.lexeme),
                );
                return None;
            }
        };

        let mut extension = String::new();
        while self.check(TokenType::Star) {
            self.advance();
            extension.push('*');
        }
        Some((ty, extension))
    }

    fn parse_member<S: ErrorSink>(&mut self, sink: &mut S) -> Option<String> {
        let (ty, extension) = self.parse_type_spec(sink)?;
        let name_tok = self.consume(TokenType::Identifier, sink, "expected member name")?;
        Some(format!("{}{extension} {}", builtin_to_c(ty), name_tok.lexeme))
    }

    fn parse_struct_decl<S: ErrorSink>(&mut self, sink: &mut S) -> Option<Statement> {
        let name_tok = self.consume(TokenType::Identifier, sink, "expected struct name")?;
        let name = name_tok.lexeme.to_string();
        self.consume(TokenType::LeftBrace, sink, "expected '{' after struct name")?;

        let mut members = Vec::new();
        if !self.check(TokenType::RightBrace) {
            loop {
                members.push(self.parse_member(sink)?);
                if !self.match_token(&[TokenType::Comma]) {
                    break;
                }
            }
        }

        self.consume(TokenType::RightBrace, sink, "expected '}' after struct members")?;
        self.consume(TokenType::Semicolon, sink, "expected ';' after struct declaration")?;
        Some(Statement::Struct { name, members })
    }

    fn parse_function_decl<S: ErrorSink>(&mut self, sink: &mut S) -> Option<Statement> {
        let (return_type, extension) = self.parse_type_spec(sink)?;
        if !extension.is_empty() {
            let pos = self.peek().map(|t| t.position).unwrap_or_else(|| self.eof_position());
            sink.report(
                DiagnosticKind::Parse,
                pos,
                "a function's return type may not use a pointer extension",
            );
            return None;
        }

        let name_tok = self.consume(TokenType::Identifier, sink, "expected function name")?;
        let name = name_tok.lexeme.to_string();

        self.consume(TokenType::LeftParen, sink, "expected '(' after function name")?;
        let raw_args = self.capture_raw_until(&[TokenType::RightParen]);
        self.consume(TokenType::RightParen, sink, "expected ')' after parameters")?;

        let body = self.parse_block(sink)?;
        Some(Statement::Function {
            name,
            raw_args,
            return_type,
            body,
        })
    }

    fn parse_top_level_declaration<S: ErrorSink>(&mut self, sink: &mut S) -> Option<Statement> {
        match self.peek_kind() {
            Some(TokenType::Identifier) => self.parse_struct_decl(sink),
            Some(kind) if is_builtin_type_token(kind) => self.parse_function_decl(sink),
            _ => {
                let pos = self.peek().map(|t| t.position).unwrap_or_else(|| self.eof_position());
                sink.report(
                    DiagnosticKind::Parse,
                    pos,
                    "expected a struct or function declaration",
                );
                None
            }
        }
    }

    fn parse_block<S: ErrorSink>(&mut self, sink: &mut S) -> Option<Block> {
        self.consume(TokenType::LeftBrace, sink, "expected '{'")?;
        let mut statements = Vec::new();

        while !self.check(TokenType::RightBrace) && !self.is_at_end() {
            match self.parse_statement(sink) {
                Some(stmt) => statements.push(stmt),
                None => self.synchronize(),
            }
        }

        self.consume(TokenType::RightBrace, sink, "expected '}'")?;
        Some(Block::new(statements))
    }

    fn parse_statement<S: ErrorSink>(&mut self, sink: &mut S) -> Option<Statement> {
        match self.peek_kind() {
            Some(TokenType::If) => self.parse_if(sink),
            Some(TokenType::While) => self.parse_while(sink),
            Some(TokenType::For) => self.parse_for(sink),
            Some(TokenType::Return) => self.parse_return(sink),
            Some(TokenType::LeftBrace) => self.parse_block(sink).map(Statement::Block),
            Some(TokenType::Mut) => self.parse_var_or_array_decl(sink),
            Some(kind) if is_builtin_type_token(kind) => self.parse_var_or_array_decl(sink),
            Some(TokenType::Identifier) => self.parse_identifier_led_statement(sink),
            Some(_) => {
                let pos = self.peek().map(|t| t.position).unwrap_or_else(|| self.eof_position());
                sink.report(DiagnosticKind::Parse, pos, "expected a statement");
                None
            }
            None => {
                sink.report(
                    DiagnosticKind::Parse,
                    self.eof_position(),
                    "unexpected end of input, expected a statement",
                );
                None
            }
        }
    }

    fn parse_identifier_led_statement<S: ErrorSink>(&mut self, sink: &mut S) -> Option<Statement> {
        match self.peek_at(1) {
            Some(TokenType::PlusEqual) => self.parse_plus_equal(sink),
            Some(TokenType::LeftBracket) => self.parse_index_stmt(sink),
            Some(TokenType::LeftParen) => self.parse_call_stmt(sink),
            _ => self.parse_expr_stmt(sink),
        }
    }

    fn parse_plus_equal<S: ErrorSink>(&mut self, sink: &mut S) -> Option<Statement> {
        let name_tok = self.consume(TokenType::Identifier, sink, "expected identifier")?;
        self.consume(TokenType::PlusEqual, sink, "expected '+='")?;
        let expr = self.capture_raw_until(&[TokenType::Semicolon]);
        self.consume(TokenType::Semicolon, sink, "expected ';'")?;
        Some(Statement::PlusEqual {
            name: name_tok.lexeme.to_string(),
            expr,
        })
    }

    fn parse_index_stmt<S: ErrorSink>(&mut self, sink: &mut S) -> Option<Statement> {
        let name_tok = self.consume(TokenType::Identifier, sink, "expected identifier")?;
        self.consume(TokenType::LeftBracket, sink, "expected '['")?;
        let index = self.capture_raw_until(&[TokenType::RightBracket]);
        self.consume(TokenType::RightBracket, sink, "expected ']'")?;
        self.consume(TokenType::Equal, sink, "expected '='")?;
        let value = self.capture_raw_until(&[TokenType::Semicolon]);
        self.consume(TokenType::Semicolon, sink, "expected ';'")?;
        Some(Statement::IndexOperator {
            name: name_tok.lexeme.to_string(),
            index,
            value,
        })
    }

    fn parse_call_stmt<S: ErrorSink>(&mut self, sink: &mut S) -> Option<Statement> {
        let name_tok = self.consume(TokenType::Identifier, sink, "expected identifier")?;
        self.consume(TokenType::LeftParen, sink, "expected '('")?;
        let args = self.capture_raw_until(&[TokenType::RightParen]);
        self.consume(TokenType::RightParen, sink, "expected ')'")?;
        self.consume(TokenType::Semicolon, sink, "expected ';'")?;
        Some(Statement::FunctionCall {
            name: name_tok.lexeme.to_string(),
            args,
        })
    }

    fn parse_expr_stmt<S: ErrorSink>(&mut self, sink: &mut S) -> Option<Statement> {
        let expr = self.capture_raw_until(&[TokenType::Semicolon]);
        self.consume(TokenType::Semicolon, sink, "expected ';' after expression")?;
        Some(Statement::Expression(expr))
    }

    fn parse_return<S: ErrorSink>(&mut self, sink: &mut S) -> Option<Statement> {
        self.consume(TokenType::Return, sink, "expected 'return'")?;
        let expr = if self.check(TokenType::Semicolon) {
            String::new()
        } else {
            self.capture_raw_until(&[TokenType::Semicolon])
        };
        self.consume(TokenType::Semicolon, sink, "expected ';' after return")?;
        Some(Statement::Return(expr))
    }

    fn parse_if<S: ErrorSink>(&mut self, sink: &mut S) -> Option<Statement> {
        self.consume(TokenType::If, sink, "expected 'if'")?;
        self.consume(TokenType::LeftParen, sink, "expected '(' after 'if'")?;
        let condition = self.capture_raw_until(&[TokenType::RightParen]);
        self.consume(TokenType::RightParen, sink, "expected ')' after condition")?;
        let then_block = self.parse_block(sink)?;
        let else_block = if self.match_token(&[TokenType::Else]) {
            self.parse_block(sink)?
        } else {
            Block::default()
        };
        Some(Statement::If {
            condition,
            then_block,
            else_block,
        })
    }

    fn parse_while<S: ErrorSink>(&mut self, sink: &mut S) -> Option<Statement> {
        self.consume(TokenType::While, sink, "expected 'while'")?;
        self.consume(TokenType::LeftParen, sink, "expected '(' after 'while'")?;
        let condition = self.capture_raw_until(&[TokenType::RightParen]);
        self.consume(TokenType::RightParen, sink, "expected ')' after condition")?;
        let body = self.parse_block(sink)?;
        Some(Statement::While { condition, body })
    }

    fn parse_for<S: ErrorSink>(&mut self, sink: &mut S) -> Option<Statement> {
        self.consume(TokenType::For, sink, "expected 'for'")?;
        self.consume(TokenType::LeftParen, sink, "expected '(' after 'for'")?;
        let init = self.parse_for_init(sink)?;
        let condition = self.capture_raw_until(&[TokenType::Semicolon]);
        self.consume(TokenType::Semicolon, sink, "expected ';' after for-condition")?;
        let increment = self.capture_raw_until(&[TokenType::RightParen]);
        self.consume(TokenType::RightParen, sink, "expected ')' after for-clauses")?;
        let body = self.parse_block(sink)?;
        Some(Statement::For {
            init: Box::new(init),
            condition,
            increment,
            body,
        })
    }

    fn parse_for_init<S: ErrorSink>(&mut self, sink: &mut S) -> Option<Statement> {
        match self.peek_kind() {
            Some(TokenType::Mut) => self.parse_var_or_array_decl(sink),
            Some(kind) if is_builtin_type_token(kind) => self.parse_var_or_array_decl(sink),
            _ => self.parse_expr_stmt(sink),
        }
    }

    fn parse_var_or_array_decl<S: ErrorSink>(&mut self, sink: &mut S) -> Option<Statement> {
        let mutable = self.match_token(&[TokenType::Mut]);
        let (ty, type_ext) = self.parse_type_spec(sink)?;
        let name_tok = self.consume(TokenType::Identifier, sink, "expected a name")?;
        let name = name_tok.lexeme.to_string();

        if self.match_token(&[TokenType::LeftBracket]) {
            self.consume(TokenType::RightBracket, sink, "expected ']' in array declaration")?;
            self.consume(TokenType::Equal, sink, "expected '=' in array declaration")?;
            self.consume(TokenType::LeftBrace, sink, "expected '{' before array elements")?;
            let elements = self.capture_raw_until(&[TokenType::RightBrace]);
            self.consume(TokenType::RightBrace, sink, "expected '}' after array elements")?;
            self.consume(TokenType::Semicolon, sink, "expected ';' after array declaration")?;
            return Some(Statement::Array {
                mutable,
                ty,
                extension: format!("{type_ext}[]"),
                name,
                elements,
            });
        }

        self.consume(TokenType::Equal, sink, "expected '=' in variable declaration")?;
        let init = self.capture_raw_until(&[TokenType::Semicolon]);
        self.consume(TokenType::Semicolon, sink, "expected ';' after variable declaration")?;
        Some(Statement::Variable {
            mutable,
            ty,
            extension: type_ext,
            name,
            init,
        })
    }

    fn parse_module<S: ErrorSink>(&mut self, sink: &mut S) -> Statement {
        let mut includes = Vec::new();
        while self.check(TokenType::Include) {
            if let Some(tok) = self.advance() {
                includes.push(tok.lexeme.to_string());
            }
        }

        let mut structs = Vec::new();
        let mut functions = Vec::new();

        while !self.is_at_end() {
            match self.parse_top_level_declaration(sink) {
                Some(stmt @ Statement::Struct { .. }) => structs.push(stmt),
                Some(stmt @ Statement::Function { .. }) => functions.push(stmt),
                Some(_) => unreachable!("parse_top_level_declaration only yields Struct/Function"),
                None => {
                    log::warn!("parser: synchronizing after a malformed top-level declaration");
                    self.synchronize();
                }
            }
        }

        log::debug!(
            "parse: module with {} struct(s), {} function(s)",
            structs.len(),
            functions.len()
        );

        Statement::Module {
            name: String::new(),
            includes,
            structs: Block::new(structs),
            functions: Block::new(functions),
        }
    }
}

/// Parses `tokens` into a Module statement, reporting through `sink`.
///
/// Terminates for every token sequence, including truncated or malformed ones: every inner parsing
/// function either makes progress by consuming at least one token or reports through `sink` and
/// returns `None`, in which case the caller calls [`Parser::synchronize`], which itself always
/// consumes at least one token. A Module returned after `sink.has_errors()` is `true` is a best-effort
/// partial tree, not a guarantee of structural completeness.
pub fn parse<'a, S: ErrorSink>(tokens: &[Token<'a>], sink: &mut S) -> Statement {
    Parser::new(tokens).parse_module(sink)
}
