#![forbid(unsafe_code)]
//! rungen - test-runner generator for C unit tests
//!
//! Given a C test source, rungen finds its `void test*(void)` functions and the mocks it includes,
//! then writes a runner translation unit that calls the fixtures, runs each test behind the
//! framework's recovery point, manages mock lifecycles and reports results.
//!
//! ## Layout
//!
//! - `rungen_scan` (workspace crate) - comment stripping, test discovery, include/mock resolution
//! - `config` - generation options and config files
//! - `backend` - C emission of the runner
//! - `generator` - the read → scan → emit → write pipeline
//! - `cli` - command line
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod backend;
pub mod cli;
pub mod config;
pub mod errors;
pub mod generator;

pub use rungen_scan::{TestCase, resolve_includes, resolve_mocks, scan};

pub use backend::emit;
pub use config::{ConfigSource, GenerationOptions};
pub use errors::{ConfigError, GenError, GenResult};
pub use generator::{RunnerGenerator, SourceAnalysis};
