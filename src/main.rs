use std::process::ExitCode;

use anyhow::Context;
use clap::Parser as ClapParser;

use emberc::{CompileOptions, Driver};

/// Compiles a source file to equivalent C.
#[derive(ClapParser, Debug)]
#[command(name = "emberc", version, about, long_about = None)]
struct Cli {
    /// Source file to compile.
    input: String,

    /// Output path. Defaults to INPUT with its extension replaced by `.c`.
    #[arg(short, long, value_name = "FILE")]
    output: Option<std::path::PathBuf>,

    /// Print the token stream instead of compiling.
    #[arg(long)]
    print_tokens: bool,

    /// Increase logging verbosity. Repeat for more detail (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let options = CompileOptions {
        output_path: cli.output,
        print_tokens: cli.print_tokens,
    };

    let driver = Driver::new();
    match driver.compile_file(&cli.input, &options) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(emberc::CompileError::Diagnostics(count)) => {
            log::error!("{count} diagnostic(s); no output written");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err).with_context(|| format!("compiling {}", cli.input)),
    }
}
