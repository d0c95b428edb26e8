//! Error types for runner generation.
//!
//! Everything the generator can fail on is an I/O problem or a configuration problem. Test
//! outcomes are never errors here: pass/fail is decided by the generated runner at run time.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while resolving generation options.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unrecognized configuration source '{0}'")]
    #[diagnostic(
        code(rungen::config::unrecognized),
        help("pass a .yml or .yaml file, or leave the configuration out to use defaults")
    )]
    UnrecognizedSource(String),

    #[error("cannot read config file '{}'", path.display())]
    #[diagnostic(code(rungen::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in config file '{}'", path.display())]
    #[diagnostic(code(rungen::config::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("config file '{}' has neither a `unity` nor a `cmock` section", path.display())]
    #[diagnostic(
        code(rungen::config::missing_section),
        help("options are read from the `:unity:` section, or from `:cmock:` when there is none")
    )]
    MissingSection { path: PathBuf },
}

/// Errors raised while generating a runner.
#[derive(Debug, Error, Diagnostic)]
pub enum GenError {
    #[error("cannot read test source '{}'", path.display())]
    #[diagnostic(code(rungen::io::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("test source '{}' is too large ({size} bytes, max {max} bytes)", path.display())]
    #[diagnostic(code(rungen::io::too_large))]
    SourceTooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("cannot write runner '{}'", path.display())]
    #[diagnostic(code(rungen::io::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for generation operations.
pub type GenResult<T> = Result<T, GenError>;
