//! # Driver Module
//!
//! The compile pipeline a CLI (or an embedding crate) actually calls: read a source file, run
//! lex → parse → render, and write the result to a `.c` file — or report every collected
//! diagnostic and refuse to write anything if the Supervisor saw errors.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::vellum::lexer::lex;
use crate::vellum::parser::parse;
use crate::vellum::sink::Supervisor;

/// Compile-time configuration for [`Driver::compile_file`].
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Explicit output path. When absent, the input path with its extension replaced by `.c` is
    /// used.
    pub output_path: Option<PathBuf>,
    /// When set, the token stream is printed to stdout instead of being compiled — a debugging aid
    /// over the lexer alone.
    pub print_tokens: bool,
}

/// Errors the driver can surface. Diagnostics collected by the Supervisor are reported separately
/// (printed to stderr and logged) before this error is returned, so callers don't need to re-derive
/// them from `Diagnostics`' count.
#[derive(Error, Debug)]
pub enum CompileError {
    /// The source file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The path that failed to open.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The rendered output could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The path that failed to write.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Lexing or parsing reported at least one diagnostic; no output was written.
    #[error("compilation failed with {0} diagnostic(s)")]
    Diagnostics(usize),
}

/// Orchestrates one source-file-to-`.c`-file compilation.
#[derive(Debug, Default)]
pub struct Driver;

impl Driver {
    /// Builds a driver. Stateless — kept as a type (rather than a bare function) to leave room for
    /// future per-run configuration.
    pub fn new() -> Self {
        Self
    }

    /// Reads `input_path`, lexes, parses, and — if no diagnostics were reported — renders the
    /// resulting Module and writes it to the configured output path, returning the rendered text.
    ///
    /// On any diagnostic, every collected diagnostic is printed to stderr and logged at `error`
    /// level, and no output file is written.
    pub fn compile_file(
        &self,
        input_path: &str,
        options: &CompileOptions,
    ) -> Result<String, CompileError> {
        let output_path = self.determine_output_path(input_path, options);
        log::info!("compiling {input_path} -> {}", output_path.display());

        let source = fs::read_to_string(input_path).map_err(|source| CompileError::Read {
            path: input_path.to_string(),
            source,
        })?;

        let mut sink = Supervisor::new();
        let tokens = lex(&source, &mut sink);

        if options.print_tokens {
            for token in &tokens {
                println!(
                    "{:?} {:?} @ {}..{}",
                    token.kind, token.lexeme, token.position.start, token.position.end
                );
            }
        }

        let module = parse(&tokens, &mut sink);

        if sink.has_errors() {
            for line in sink.render_report().lines() {
                log::error!("{line}");
                eprintln!("{line}");
            }
            return Err(CompileError::Diagnostics(sink.diagnostics().len()));
        }

        let rendered = module.render();
        fs::write(&output_path, &rendered).map_err(|source| CompileError::Write {
            path: output_path.to_string_lossy().into_owned(),
            source,
        })?;

        log::info!("wrote {}", output_path.display());
        Ok(rendered)
    }

    fn determine_output_path(&self, input_path: &str, options: &CompileOptions) -> PathBuf {
        match &options.output_path {
            Some(path) => path.clone(),
            None => Path::new(input_path).with_extension("c"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn compiles_a_minimal_source_file() {
        let mut input = tempfile::Builder::new().suffix(".ec").tempfile().unwrap();
        write!(input, "#include <stdio.h>\ni32 main() {{ return 0; }}").unwrap();

        let output_path = input.path().with_extension("c");
        let options = CompileOptions {
            output_path: Some(output_path.clone()),
            print_tokens: false,
        };

        let driver = Driver::new();
        let rendered = driver
            .compile_file(input.path().to_str().unwrap(), &options)
            .expect("compilation should succeed");

        assert!(rendered.contains("int32_t main() {\nreturn 0;\n}"));
        let written = fs::read_to_string(&output_path).unwrap();
        assert_eq!(written, rendered);

        let _ = fs::remove_file(&output_path);
    }

    #[test]
    fn reports_diagnostics_instead_of_writing_output() {
        let mut input = tempfile::Builder::new().suffix(".ec").tempfile().unwrap();
        write!(input, "i32 main( { {{ @ }} ").unwrap();

        let output_path = input.path().with_extension("c");
        let options = CompileOptions {
            output_path: Some(output_path.clone()),
            print_tokens: false,
        };

        let driver = Driver::new();
        let result = driver.compile_file(input.path().to_str().unwrap(), &options);
        assert!(matches!(result, Err(CompileError::Diagnostics(_))));
        assert!(!output_path.exists());
    }

    #[test]
    fn missing_input_file_is_a_read_error() {
        let driver = Driver::new();
        let result = driver.compile_file("/no/such/path.ec", &CompileOptions::default());
        assert!(matches!(result, Err(CompileError::Read { .. })));
    }
}
