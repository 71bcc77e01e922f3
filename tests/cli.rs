//! End-to-end tests against the `emberc` binary.
//!
//! Grounded on the assert_cmd/predicates/tempfile style used for CLI-level tests elsewhere in the
//! pack: spawn the real binary, assert on its exit code and stdout/stderr, and check the `.c` file it
//! leaves behind rather than re-testing the pipeline through the library API.

use std::fs;
use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::Builder;

fn emberc() -> Command {
    Command::cargo_bin("emberc").expect("emberc binary should build")
}

#[test]
fn compiles_a_minimal_program_to_c() {
    let mut input = Builder::new().suffix(".ec").tempfile().unwrap();
    write!(input, "i32 main() {{ return 0; }}").unwrap();
    let output_path = input.path().with_extension("c");

    emberc()
        .arg(input.path())
        .arg("-o")
        .arg(&output_path)
        .assert()
        .success();

    let written = fs::read_to_string(&output_path).unwrap();
    assert!(written.contains("int32_t main() {\nreturn 0;\n}"));

    let _ = fs::remove_file(&output_path);
}

#[test]
fn defaults_output_path_to_input_with_c_extension() {
    let mut input = Builder::new().suffix(".ec").tempfile().unwrap();
    write!(input, "i32 main() {{ return 0; }}").unwrap();
    let expected_output = input.path().with_extension("c");

    emberc().arg(input.path()).assert().success();

    assert!(expected_output.exists());
    let _ = fs::remove_file(&expected_output);
}

#[test]
fn reports_diagnostics_and_exits_nonzero_without_writing_output() {
    let mut input = Builder::new().suffix(".ec").tempfile().unwrap();
    write!(input, "i32 main( {{ return 0; }}").unwrap();
    let output_path = input.path().with_extension("c");

    emberc()
        .arg(input.path())
        .arg("-o")
        .arg(&output_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected"));

    assert!(!output_path.exists());
}

#[test]
fn missing_input_file_is_reported_as_an_error() {
    emberc()
        .arg("/no/such/file.ec")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn print_tokens_lists_the_token_stream_instead_of_compiling() {
    let mut input = Builder::new().suffix(".ec").tempfile().unwrap();
    write!(input, "i32 main() {{ return 0; }}").unwrap();
    let output_path = input.path().with_extension("c");

    emberc()
        .arg(input.path())
        .arg("--print-tokens")
        .arg("-o")
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Identifier"));
}

#[test]
fn help_lists_usage_and_options() {
    emberc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--print-tokens"));
}
