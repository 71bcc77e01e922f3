//! # Lexer Module
//!
//! Cursor-driven tokenizer for the source language. Converts a source string into a flat, ordered
//! sequence of [`Token`]s for the parser to consume.
//!
//! The lexer never panics and never aborts on bad input: unrecognized characters are reported
//! through an injected [`ErrorSink`] and the lexer advances past them, guaranteeing termination.
//! Once the sink reports an error, [`Lexer::next_token`] stops producing real tokens and returns the
//! "dumb" sentinel instead; [`lex`] stops collecting at that point and returns whatever prefix of the
//! token stream it had already built.
//!
//! ## Examples
//!
//! ```
//! use emberc::{lex, Supervisor, TokenType};
//!
//! let mut sink = Supervisor::new();
//! let tokens = lex("void main() { return 0; }", &mut sink);
//!
//! assert_eq!(tokens[0].kind, TokenType::Void);
//! assert_eq!(tokens[1].kind, TokenType::Identifier);
//! assert_eq!(tokens[2].kind, TokenType::LeftParen);
//! ```

use std::collections::HashMap;

use crate::vellum::sink::{DiagnosticKind, ErrorSink, Position};

/// The closed set of token kinds the lexer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TokenType {
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Semicolon,
    Comma,
    Star,
    Minus,
    Arrow,
    MinusMinus,
    Equal,
    EqualEqual,
    Plus,
    PlusEqual,
    Less,
    LessEqual,
    Identifier,
    /// A whole `#include <...>` / `#include "..."` directive, collapsed into a single token whose
    /// lexeme is just the bracketed/quoted path (e.g. `<stdio.h>`), matching the Module statement's
    /// `includes` field, which stores entries the same way.
    Include,

    // Keywords
    If,
    Else,
    While,
    For,
    Return,
    Mut,
    Void,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F64,
    Bool,
    Char,

    /// End of file.
    Eof,
    /// Sentinel returned once the sink has errors. Callers must not treat it as data.
    Dumb,
}

/// A single lexical token: its kind, the exact source slice it spans, and its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// Which kind of token this is.
    pub kind: TokenType,
    /// The source text that produced this token. Empty for `Eof`/`Dumb`.
    pub lexeme: &'a str,
    /// Byte-offset span of this token in the source buffer.
    pub position: Position,
}

impl<'a> Token<'a> {
    fn new(kind: TokenType, lexeme: &'a str, position: Position) -> Self {
        Self {
            kind,
            lexeme,
            position,
        }
    }
}

fn keyword_table() -> HashMap<&'static str, TokenType> {
    let mut m = HashMap::new();
    m.insert("if", TokenType::If);
    m.insert("else", TokenType::Else);
    m.insert("while", TokenType::While);
    m.insert("for", TokenType::For);
    m.insert("return", TokenType::Return);
    m.insert("mut", TokenType::Mut);
    m.insert("void", TokenType::Void);
    m.insert("u8", TokenType::U8);
    m.insert("u16", TokenType::U16);
    m.insert("u32", TokenType::U32);
    m.insert("u64", TokenType::U64);
    m.insert("i8", TokenType::I8);
    m.insert("i16", TokenType::I16);
    m.insert("i32", TokenType::I32);
    m.insert("i64", TokenType::I64);
    m.insert("f64", TokenType::F64);
    m.insert("bool", TokenType::Bool);
    m.insert("char", TokenType::Char);
    m
}

/// Cursor-driven tokenizer over an immutable source buffer.
///
/// Exposes a pull-based `next_token` so the parser (or a driver printing the raw token stream) can
/// consume tokens one at a time; [`lex`] is the convenience wrapper most callers want.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Vec<char>,
    current: usize,
    keywords: HashMap<&'static str, TokenType>,
}

impl<'a> Lexer<'a> {
    /// Builds a lexer over `source`, starting at offset 0.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            current: 0,
            keywords: keyword_table(),
        }
    }

    /// The current byte offset of the cursor within the source.
    pub fn cursor(&self) -> usize {
        self.char_offset_to_byte(self.current)
    }

    /// Whether the cursor has consumed the whole source.
    pub fn eof(&self) -> bool {
        self.current >= self.chars.len()
    }

    /// The character at the cursor, or `None` at end-of-input.
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.current).copied()
    }

    /// The character `k` positions ahead of the cursor (`peek_ahead(0) == peek()`), or `None` past
    /// end-of-input.
    pub fn peek_ahead(&self, k: usize) -> Option<char> {
        self.chars.get(self.current + k).copied()
    }

    /// Advances the cursor by `k` characters.
    pub fn advance(&mut self, k: usize) {
        self.current = (self.current + k).min(self.chars.len());
    }

    fn char_offset_to_byte(&self, char_offset: usize) -> usize {
        self.chars[..char_offset.min(self.chars.len())]
            .iter()
            .map(|c| c.len_utf8())
            .sum()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' || c == '\n' {
                self.advance(1);
            } else {
                break;
            }
        }
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        let byte_start = self.char_offset_to_byte(start);
        let byte_end = self.char_offset_to_byte(end);
        &self.source[byte_start..byte_end]
    }

    fn dumb(&self) -> Token<'a> {
        Token::new(TokenType::Dumb, "", Position::at(self.cursor()))
    }

    /// Produces the next token, reporting through `sink` on invalid input.
    ///
    /// Returns the `Eof` token (not filtered here — [`lex`] does that) once the source is exhausted,
    /// and the `Dumb` sentinel immediately if `sink.has_errors()` is already true.
    pub fn next_token<S: ErrorSink>(&mut self, sink: &mut S) -> Token<'a> {
        if sink.has_errors() {
            return self.dumb();
        }

        self.skip_whitespace();

        if self.eof() {
            return Token::new(TokenType::Eof, "", Position::at(self.cursor()));
        }

        let start = self.current;
        let c = self.peek().expect("checked not eof above");

        let kind = match c {
            '(' => {
                self.advance(1);
                TokenType::LeftParen
            }
            ')' => {
                self.advance(1);
                TokenType::RightParen
            }
            '{' => {
                self.advance(1);
                TokenType::LeftBrace
            }
            '}' => {
                self.advance(1);
                TokenType::RightBrace
            }
            '[' => {
                self.advance(1);
                TokenType::LeftBracket
            }
            ']' => {
                self.advance(1);
                TokenType::RightBracket
            }
            ';' => {
                self.advance(1);
                TokenType::Semicolon
            }
            ',' => {
                self.advance(1);
                TokenType::Comma
            }
            '*' => {
                self.advance(1);
                TokenType::Star
            }
            '-' => {
                if self.peek_ahead(1) == Some('>') {
                    self.advance(2);
                    TokenType::Arrow
                } else if self.peek_ahead(1) == Some('-') {
                    self.advance(2);
                    TokenType::MinusMinus
                } else {
                    self.advance(1);
                    TokenType::Minus
                }
            }
            '=' => {
                if self.peek_ahead(1) == Some('=') {
                    self.advance(2);
                    TokenType::EqualEqual
                } else {
                    self.advance(1);
                    TokenType::Equal
                }
            }
            '+' => {
                if self.peek_ahead(1) == Some('=') {
                    self.advance(2);
                    TokenType::PlusEqual
                } else {
                    self.advance(1);
                    TokenType::Plus
                }
            }
            '<' => {
                if self.peek_ahead(1) == Some('=') {
                    self.advance(2);
                    TokenType::LessEqual
                } else {
                    self.advance(1);
                    TokenType::Less
                }
            }
            '#' => return self.include_directive(start),
            _ => return self.identifier_or_keyword(sink, start),
        };

        Token::new(kind, self.slice(start, self.current), Position::new(start, self.current))
    }

    /// Collapses a `#include <...>` / `#include "..."` directive into one `Include` token whose
    /// lexeme is the bracketed/quoted path only (no `#include` prefix, matching how the Module
    /// statement stores its include list). Anything between the `#` and the opening `<`/`"` is
    /// skipped without being validated against the literal text `include` — the directive keyword
    /// itself carries no information the renderer needs.
    fn include_directive(&mut self, start: usize) -> Token<'a> {
        while let Some(c) = self.peek() {
            if c == '<' || c == '"' {
                break;
            }
            self.advance(1);
        }

        let closing = match self.peek() {
            Some('<') => '>',
            Some('"') => '"',
            _ => return Token::new(TokenType::Include, self.slice(start, self.current), Position::new(start, self.current)),
        };

        let content_start = self.current;
        self.advance(1);
        while let Some(c) = self.peek() {
            self.advance(1);
            if c == closing {
                break;
            }
        }

        let lexeme = self.slice(content_start, self.current);
        Token::new(TokenType::Include, lexeme, Position::new(start, self.current))
    }

    fn identifier_or_keyword<S: ErrorSink>(&mut self, sink: &mut S, start: usize) -> Token<'a> {
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance(1);
            } else {
                break;
            }
        }

        if self.current == start {
            // Unrecognized leading character: report and advance one byte so the cursor always
            // makes forward progress even on pathological input.
            let bad = self.peek().expect("checked not eof before dispatch");
            sink.report(
                DiagnosticKind::Lex,
                Position::new(start, start + 1),
                format!("unrecognized character '{bad}'"),
            );
            self.advance(1);
            return self.dumb();
        }

        let lexeme = self.slice(start, self.current);
        let kind = self
            .keywords
            .get(lexeme)
            .copied()
            .unwrap_or(TokenType::Identifier);
        Token::new(kind, lexeme, Position::new(start, self.current))
    }
}

/// Lexes `source` into an ordered token sequence, reporting through `sink`.
///
/// Terminates for every input (the identifier path always makes progress, per
/// [`Lexer::identifier_or_keyword`]'s zero-length guard). Stops early once `sink.has_errors()`
/// becomes true, returning the tokens collected so far. `Eof`/`Dumb` sentinels are filtered out of
/// the returned sequence — they exist only to drive the loop here and in the parser.
pub fn lex<'a, S: ErrorSink>(source: &'a str, sink: &mut S) -> Vec<Token<'a>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    loop {
        if sink.has_errors() {
            break;
        }
        let token = lexer.next_token(sink);
        match token.kind {
            TokenType::Eof => break,
            TokenType::Dumb => break,
            _ => tokens.push(token),
        }
    }

    log::debug!("lex: produced {} tokens", tokens.len());
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vellum::sink::Supervisor;

    fn lex_ok(source: &str) -> Vec<Token<'_>> {
        let mut sink = Supervisor::new();
        let tokens = lex(source, &mut sink);
        assert!(!sink.has_errors(), "unexpected lex errors for {source:?}");
        tokens
    }

    #[test]
    fn lexer_totality_on_arbitrary_input() {
        // Must terminate (and not panic) on garbage, mixed, and empty input.
        for source in ["", "@@@", "   \t\n  ", "i32 x = 1; @ y", "----->"] {
            let mut sink = Supervisor::new();
            let _ = lex(source, &mut sink);
        }
    }

    #[test]
    fn positional_monotonicity() {
        let tokens = lex_ok("i32 x = 1 + 2;");
        for w in tokens.windows(2) {
            assert!(w[0].position.end <= w[1].position.start);
        }
    }

    #[test]
    fn s1_minus_disambiguation() {
        let tokens = lex_ok("- -> --");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, [TokenType::Minus, TokenType::Arrow, TokenType::MinusMinus]);
        let lexemes: Vec<_> = tokens.iter().map(|t| t.lexeme).collect();
        assert_eq!(lexemes, ["-", "->", "--"]);
    }

    #[test]
    fn minus_at_eof_is_still_minus() {
        let tokens = lex_ok("-");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenType::Minus);
    }

    #[test]
    fn s2_equal_less_plus_compounds() {
        let tokens = lex_ok("= == < <= + +=");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            [
                TokenType::Equal,
                TokenType::EqualEqual,
                TokenType::Less,
                TokenType::LessEqual,
                TokenType::Plus,
                TokenType::PlusEqual,
            ]
        );
    }

    #[test]
    fn s3_identifier_vs_keyword_longest_match() {
        let tokens = lex_ok("mut foo_bar mutation");
        assert_eq!(tokens[0].kind, TokenType::Mut);
        assert_eq!(tokens[1].kind, TokenType::Identifier);
        assert_eq!(tokens[1].lexeme, "foo_bar");
        assert_eq!(tokens[2].kind, TokenType::Identifier);
        assert_eq!(tokens[2].lexeme, "mutation");
    }

    #[test]
    fn keyword_priority_never_yields_eof() {
        let table = keyword_table();
        for (_, kind) in table.iter() {
            assert_ne!(*kind, TokenType::Eof);
        }
    }

    #[test]
    fn unrecognized_character_reports_and_advances() {
        let mut sink = Supervisor::new();
        let tokens = lex("@", &mut sink);
        assert!(sink.has_errors());
        assert!(tokens.is_empty());
    }

    #[test]
    fn unrecognized_character_does_not_livelock_and_truncates_stream() {
        let mut sink = Supervisor::new();
        let tokens = lex("i32 @ x", &mut sink);
        assert!(sink.has_errors());
        // Only the tokens before the bad character are kept.
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenType::I32);
    }

    #[test]
    fn include_directive_collapses_to_bracketed_path() {
        let tokens = lex_ok("#include <stdio.h>\nvoid main() {}");
        assert_eq!(tokens[0].kind, TokenType::Include);
        assert_eq!(tokens[0].lexeme, "<stdio.h>");
        assert_eq!(tokens[1].kind, TokenType::Void);
    }

    #[test]
    fn quoted_include_directive_keeps_quotes() {
        let tokens = lex_ok(r#"#include "local.h""#);
        assert_eq!(tokens[0].kind, TokenType::Include);
        assert_eq!(tokens[0].lexeme, "\"local.h\"");
    }

    #[test]
    fn whitespace_is_skipped_between_tokens() {
        let tokens = lex_ok("  i32\t\tx\n=\r\n1  ");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            [TokenType::I32, TokenType::Identifier, TokenType::Equal, TokenType::Identifier]
        );
    }
}
