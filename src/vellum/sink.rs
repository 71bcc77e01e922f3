//! # Error Sink Module
//!
//! The lexer and parser never abort on bad input. Instead they report diagnostics through an
//! injected [`ErrorSink`] and keep going (returning a truncated token stream, or synchronizing to
//! the next statement), so one bad character or statement doesn't prevent everything around it from
//! being reported too.
//!
//! [`Supervisor`] is the crate's concrete sink: it collects every diagnostic in order and knows how
//! to format them for the driver. Nothing about the trait assumes a single-threaded caller, but the
//! `Supervisor` itself does no locking — sharing one across threads is the caller's problem, per the
//! crate's concurrency model.

use std::fmt;

/// Byte-offset range into the original source buffer. Diagnostic-only: never fed back into
/// rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Position {
    /// Builds a position spanning `[start, end)`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A zero-width position at `offset`, used when a diagnostic has no natural span (e.g. an
    /// unterminated construct reported at end-of-file).
    pub fn at(offset: usize) -> Self {
        Self::new(offset, offset)
    }
}

/// The closed set of diagnostic categories the core can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Reported by the lexer: an unrecognized character or unterminated construct.
    Lex,
    /// Reported by the parser: an unexpected token, a missing expected token, or unexpected EOF.
    Parse,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Lex => write!(f, "lex error"),
            DiagnosticKind::Parse => write!(f, "parse error"),
        }
    }
}

/// A single collected diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// What kind of error this is.
    pub kind: DiagnosticKind,
    /// Where in the source it happened.
    pub position: Position,
    /// Human-readable explanation.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.position.start, self.kind, self.message)
    }
}

/// Interface the lexer and parser use to report diagnostics and check whether to keep going.
///
/// Two operations only, per the crate's concurrency model: a query (`has_errors`) and a mutation
/// (`report`). Implementors decide what "has errors" means and how diagnostics are stored or
/// surfaced; the crate itself never inspects collected diagnostics except through this trait.
pub trait ErrorSink {
    /// Whether any diagnostic has been reported yet. The lexer and parser poll this to decide
    /// whether to keep producing tokens/statements or bail out to the dumb token / a best-effort
    /// partial tree.
    fn has_errors(&self) -> bool;

    /// Records a diagnostic.
    fn report(&mut self, kind: DiagnosticKind, position: Position, message: impl Into<String>)
    where
        Self: Sized;
}

/// The crate's concrete [`ErrorSink`]: an ordered, in-memory diagnostic collector.
#[derive(Debug, Default)]
pub struct Supervisor {
    diagnostics: Vec<Diagnostic>,
}

impl Supervisor {
    /// A fresh supervisor with no diagnostics.
    pub fn new() -> Self {
        Self::default()
    }

    /// All diagnostics collected so far, in report order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Formats every collected diagnostic as one line each, suitable for printing to stderr.
    pub fn render_report(&self) -> String {
        self.diagnostics
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ErrorSink for Supervisor {
    fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    fn report(&mut self, kind: DiagnosticKind, position: Position, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            kind,
            position,
            message: message.into(),
        });
    }
}
