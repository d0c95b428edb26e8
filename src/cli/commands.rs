//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::{self, Write};
use std::path::Path;

use crate::config::{ConfigSource, GenerationOptions};
use crate::errors::GenError;
use crate::generator::{RunnerGenerator, SourceAnalysis, read_source};

use super::{Cli, CliError, CliResult, ExitCode};

/// Resolve options: config file (if any) first, then command-line flags on top.
///
/// Flags can only switch features on; `--framework` replaces the configured framework and
/// positional includes are appended after the configured ones.
pub fn resolve_options(cli: &Cli) -> CliResult<GenerationOptions> {
    let source = match cli.config.as_deref() {
        Some(arg) => ConfigSource::from_arg(arg).map_err(GenError::from)?,
        None => ConfigSource::Default,
    };
    let mut options = source.resolve().map_err(GenError::from)?;

    options.enable_exception_wrapper |= cli.cexception;
    options.enable_coverage_flush |= cli.coverage;
    options.enable_order_enforcement |= cli.order;
    if let Some(framework) = &cli.framework {
        options.framework_name = framework.clone();
    }
    options.extra_includes.extend(cli.includes.iter().cloned());

    tracing::debug!(?options, "resolved generation options");
    Ok(options)
}

/// Write the runner and optionally print the required-files report.
pub fn generate(input: &Path, output: &Path, options: GenerationOptions, print_deps: bool) -> CliResult<ExitCode> {
    generate_to(input, output, options, print_deps, &mut io::stdout().lock())
}

/// [`generate`], with the required-files report going to `out`.
pub fn generate_to(
    input: &Path,
    output: &Path,
    options: GenerationOptions,
    print_deps: bool,
    out: &mut impl Write,
) -> CliResult<ExitCode> {
    let generator = RunnerGenerator::new(options);
    let files = generator.run(input, output)?;

    if print_deps {
        for file in &files {
            writeln!(out, "{}", file.display()).map_err(stdout_err)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the runner to stdout without touching the filesystem.
pub fn emit_stdout(input: &Path, options: GenerationOptions) -> CliResult<ExitCode> {
    emit_to(input, options, &mut io::stdout().lock())
}

/// Render the runner for `input` into `out`.
pub fn emit_to(input: &Path, options: GenerationOptions, out: &mut impl Write) -> CliResult<ExitCode> {
    let source = read_source(input)?;
    let analysis = SourceAnalysis::of(&source);
    let code = RunnerGenerator::new(options).render(&analysis, &input.display().to_string());
    out.write_all(code.as_bytes()).map_err(stdout_err)?;
    Ok(ExitCode::SUCCESS)
}

/// Print each discovered test as `name:line` (debug).
pub fn list_tests(input: &Path) -> CliResult<ExitCode> {
    list_tests_to(input, &mut io::stdout().lock())
}

/// Write each discovered test as `name:line` to `out`. Diagnostics go to stderr.
pub fn list_tests_to(input: &Path, out: &mut impl Write) -> CliResult<ExitCode> {
    let source = read_source(input)?;
    let analysis = SourceAnalysis::of(&source);

    if analysis.tests.is_empty() {
        eprintln!("No tests found in {}", input.display());
    }
    for test in &analysis.tests {
        writeln!(out, "{}:{}", test.name, test.line_number).map_err(stdout_err)?;
    }
    for mock in &analysis.mocks {
        eprintln!("mock: {}", mock);
    }
    Ok(ExitCode::SUCCESS)
}

fn stdout_err(err: io::Error) -> CliError {
    CliError::failure(format!("failed to write output: {}", err))
}
