//! # emberc
//!
//! A source-to-source compiler ("transpiler") for a small statically-typed imperative language,
//! emitting equivalent C code.
//!
//! ## Overview
//!
//! Source text flows through four stages, leaves first:
//!
//! - [`vellum::typechecker`]: a pure, total mapping from source builtin type identifiers to their C
//!   spelling.
//! - [`vellum::lexer`]: a cursor-driven tokenizer producing a finite ordered token sequence, reporting
//!   through an injected [`vellum::sink::ErrorSink`].
//! - [`vellum::parser`]: a recursive-descent consumer of that token sequence, building the statement
//!   tree below. Reports through the same sink and synchronizes past a bad statement instead of
//!   aborting the whole translation unit.
//! - [`vellum::ast`]: the statement tree itself — a closed, tagged variant where every node renders
//!   itself to a fragment of C source text.
//!
//! [`vellum::driver`] wires those stages together for a CLI: read a source file, lex, parse, and (if
//! no diagnostics were reported) render and write a `.c` file.
//!
//! ## Quick Start
//!
//! ```
//! use emberc::{lex, parse, Supervisor};
//!
//! let source = "i32 main() { return 0; }";
//! let mut sink = Supervisor::new();
//! let tokens = lex(source, &mut sink);
//! let module = parse(&tokens, &mut sink);
//!
//! assert!(!sink.has_errors());
//! assert_eq!(module.render(), "\n\nint32_t main() {\nreturn 0;\n}\n");
//! ```
//!
//! ## Non-goals
//!
//! Semantic correctness beyond surface translation (no constant folding, no dead-code elimination),
//! no preservation of source-position information in emitted C, no macro system, no generics, no
//! separate compilation of source modules beyond a single translation unit.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub mod vellum;

pub use vellum::ast::{Block, Statement};
pub use vellum::driver::{CompileError, CompileOptions, Driver};
pub use vellum::lexer::{lex, Lexer, Token, TokenType};
pub use vellum::parser::{parse, Parser};
pub use vellum::sink::{Diagnostic, DiagnosticKind, ErrorSink, Position, Supervisor};
pub use vellum::typechecker::{builtin_to_c, BuiltinType};

/// The current version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
