//! CLI module for rungen
//!
//! ## Usage
//!
//! ```text
//! rungen [OPTIONS] INPUT [OUTPUT] [INCLUDES]...
//! ```
//!
//! - `INPUT` - C test source to scan
//! - `OUTPUT` - runner to write (default: `INPUT` with `.c` replaced by `_Runner.c`)
//! - `INCLUDES` - extra headers for the runner, with or without `.h`
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::errors::GenError;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl From<GenError> for CliError {
    /// Render through miette so the cause chain and help text reach the user.
    fn from(err: GenError) -> Self {
        Self::failure(format!("{:?}", miette::Report::new(err)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Generate a test runner for a C unit-test source file
#[derive(Parser, Debug)]
#[command(name = "rungen")]
#[command(version = VERSION)]
#[command(about = "Generate a test runner for a C unit-test source file", long_about = None)]
pub struct Cli {
    /// C test source to scan
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Runner file to write (default: INPUT with `.c` replaced by `_Runner.c`)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Extra headers to include in the runner
    #[arg(value_name = "INCLUDES")]
    pub includes: Vec<String>,

    /// YAML config file (`:unity:` or `:cmock:` section)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<String>,

    /// Include CException support
    #[arg(long)]
    pub cexception: bool,

    /// Include Bullseye coverage support
    #[arg(long)]
    pub coverage: bool,

    /// Include CMock order-enforcement support
    #[arg(long)]
    pub order: bool,

    /// Framework header to include (default: unity)
    #[arg(long, value_name = "NAME")]
    pub framework: Option<String>,

    /// List discovered tests and exit (debug)
    #[arg(long, conflicts_with_all = ["stdout", "print_deps"])]
    pub list: bool,

    /// Print the runner to stdout instead of writing OUTPUT
    #[arg(long, conflicts_with = "print_deps")]
    pub stdout: bool,

    /// Print every file needed to build the runner, one per line
    #[arg(long = "print-deps")]
    pub print_deps: bool,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the parsed command line and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    let options = commands::resolve_options(&cli)?;

    if cli.list {
        return commands::list_tests(&cli.input);
    }
    if cli.stdout {
        return commands::emit_stdout(&cli.input, options);
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| crate::generator::default_output_path(&cli.input));
    commands::generate(&cli.input, &output, options, cli.print_deps)
}

// ============================================================================
// Tests
// ============================================================================
