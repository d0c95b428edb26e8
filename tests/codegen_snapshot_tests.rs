//! Golden snapshot tests for runner generation
//!
//! These tests generate runners from `.c` fixtures and compare the output
//! against stored snapshots. This ensures emission changes are reviewed and
//! intentional.
//!
//! Run with: `cargo test --test codegen_snapshot_tests`
//! Review changes: `cargo insta review`

use rungen::{GenerationOptions, RunnerGenerator, SourceAnalysis};
use std::fs;

/// Generate a runner from C test source
fn generate_runner(source: &str, options: GenerationOptions, source_id: &str) -> String {
    let analysis = SourceAnalysis::of(source);
    RunnerGenerator::new(options).render(&analysis, source_id)
}

/// Load a test file from the codegen_snapshots directory
fn load_test_file(name: &str) -> String {
    let path = format!("tests/codegen_snapshots/{}.c", name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read test file: {}", path))
}

#[test]
fn test_scenario_a_codegen() {
    let source = load_test_file("scenario_a");
    let runner = generate_runner(&source, GenerationOptions::default(), "scenario_a.c");
    insta::assert_snapshot!("scenario_a", runner);
}

#[test]
fn test_with_mocks_all_options_codegen() {
    let source = load_test_file("with_mocks");
    let options = GenerationOptions::default()
        .with_exception_wrapper(true)
        .with_coverage_flush(true)
        .with_order_enforcement(true)
        .with_extra_includes(["Types.h"]);
    let runner = generate_runner(&source, options, "with_mocks.c");
    insta::assert_snapshot!("with_mocks_all_options", runner);
}
