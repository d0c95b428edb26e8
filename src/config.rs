//! Generation options for the runner emitter.
//!
//! Options come from one of three places (see [`ConfigSource`]): built-in defaults, a YAML config
//! file shared with the mock generator, or a value built in code. The CLI layers its own flags on
//! top of whichever was resolved.
//!
//! ## Config file shape
//!
//! ```yaml
//! :cmock:
//!   :plugins:
//!     - :cexception
//!   :enforce_strict_ordering: true
//!   :includes:
//!     - Types.h
//! ```
//!
//! Keys may be written with or without the leading `:`. The `unity` section wins over `cmock` when
//! both are present.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::ConfigError;

/// Framework header used when nothing else is configured.
pub const DEFAULT_FRAMEWORK: &str = "unity";

/// Plugin name that turns on the exception wrapper.
const EXCEPTION_PLUGIN: &str = "cexception";

/// Resolved options for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Base name of the primary framework header (`unity` → `#include "unity.h"`)
    pub framework_name: String,
    /// Wrap setup/body/verify in a CException `Try`/`Catch`
    pub enable_exception_wrapper: bool,
    /// Call `cov_write()` before `main` returns
    pub enable_coverage_flush: bool,
    /// Emit and reset the mock call-order tracking globals
    pub enable_order_enforcement: bool,
    /// Additional headers, with or without a `.h` suffix
    pub extra_includes: Vec<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            framework_name: DEFAULT_FRAMEWORK.to_string(),
            enable_exception_wrapper: false,
            enable_coverage_flush: false,
            enable_order_enforcement: false,
            extra_includes: Vec::new(),
        }
    }
}

impl GenerationOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_framework(mut self, name: impl Into<String>) -> Self {
        self.framework_name = name.into();
        self
    }

    pub fn with_exception_wrapper(mut self, enabled: bool) -> Self {
        self.enable_exception_wrapper = enabled;
        self
    }

    pub fn with_coverage_flush(mut self, enabled: bool) -> Self {
        self.enable_coverage_flush = enabled;
        self
    }

    pub fn with_order_enforcement(mut self, enabled: bool) -> Self {
        self.enable_order_enforcement = enabled;
        self
    }

    /// Append extra includes, keeping their order.
    pub fn with_extra_includes<I, S>(mut self, includes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_includes.extend(includes.into_iter().map(Into::into));
        self
    }
}

/// Where generation options come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// No configuration: use [`GenerationOptions::default`].
    Default,
    /// A YAML config file.
    File(PathBuf),
    /// Options already built by the caller.
    Options(GenerationOptions),
}

impl ConfigSource {
    /// Classify a textual configuration argument.
    ///
    /// Empty text means defaults and a `.yml`/`.yaml` path means a config file. Anything else is
    /// rejected up front, before any source is scanned.
    pub fn from_arg(arg: &str) -> Result<Self, ConfigError> {
        let arg = arg.trim();
        if arg.is_empty() {
            return Ok(Self::Default);
        }
        let path = Path::new(arg);
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml" | "yaml") => Ok(Self::File(path.to_path_buf())),
            _ => Err(ConfigError::UnrecognizedSource(arg.to_string())),
        }
    }

    /// Turn this source into concrete options.
    pub fn resolve(self) -> Result<GenerationOptions, ConfigError> {
        match self {
            Self::Default => Ok(GenerationOptions::default()),
            Self::File(path) => load_config_file(&path),
            Self::Options(options) => Ok(options),
        }
    }
}

/// Load options from a YAML config file.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_config_file(path: &Path) -> Result<GenerationOptions, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text, path)
}

/// Parse YAML config text. `path` is only used for error reporting.
pub fn parse_config(text: &str, path: &Path) -> Result<GenerationOptions, ConfigError> {
    let file: ConfigFile = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let section = file
        .unity
        .or(file.cmock)
        .ok_or_else(|| ConfigError::MissingSection {
            path: path.to_path_buf(),
        })?;

    let options = GenerationOptions {
        framework_name: section
            .framework
            .as_deref()
            .map(strip_symbol)
            .unwrap_or(DEFAULT_FRAMEWORK)
            .to_string(),
        enable_exception_wrapper: section
            .plugins
            .iter()
            .any(|plugin| strip_symbol(plugin) == EXCEPTION_PLUGIN),
        enable_coverage_flush: is_truthy(section.coverage.as_ref()),
        enable_order_enforcement: is_truthy(section.enforce_strict_ordering.as_ref()),
        extra_includes: section.includes.map(OneOrMany::into_vec).unwrap_or_default(),
    };
    tracing::debug!(?options, "loaded config file");
    Ok(options)
}

/// Top-level layout of a config file. Unknown keys belong to other tools and are ignored.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default, alias = ":unity")]
    unity: Option<ConfigSection>,
    #[serde(default, alias = ":cmock")]
    cmock: Option<ConfigSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigSection {
    #[serde(default, alias = ":plugins")]
    plugins: Vec<String>,
    #[serde(default, alias = ":coverage")]
    coverage: Option<serde_yaml::Value>,
    #[serde(default, alias = ":enforce_strict_ordering")]
    enforce_strict_ordering: Option<serde_yaml::Value>,
    #[serde(default, alias = ":framework")]
    framework: Option<String>,
    #[serde(default, alias = ":includes")]
    includes: Option<OneOrMany>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

/// Anything but a missing value, `~` or `false` switches a flag on.
fn is_truthy(value: Option<&serde_yaml::Value>) -> bool {
    !matches!(value, None | Some(serde_yaml::Value::Null) | Some(serde_yaml::Value::Bool(false)))
}

/// `:cexception` and `cexception` name the same thing.
fn strip_symbol(value: &str) -> &str {
    value.strip_prefix(':').unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<GenerationOptions, ConfigError> {
        parse_config(text, Path::new("project.yml"))
    }

    // ========================================
    // Defaults and builders
    // ========================================

    #[test]
    fn test_default_options() {
        let options = GenerationOptions::default();
        assert_eq!(options.framework_name, "unity");
        assert!(!options.enable_exception_wrapper);
        assert!(!options.enable_coverage_flush);
        assert!(!options.enable_order_enforcement);
        assert!(options.extra_includes.is_empty());
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(GenerationOptions::new(), GenerationOptions::default());
    }

    #[test]
    fn test_builders() {
        let options = GenerationOptions::new()
            .with_framework("embunit")
            .with_exception_wrapper(true)
            .with_coverage_flush(true)
            .with_order_enforcement(true)
            .with_extra_includes(["Types.h", "Config"]);
        assert_eq!(options.framework_name, "embunit");
        assert!(options.enable_exception_wrapper);
        assert!(options.enable_coverage_flush);
        assert!(options.enable_order_enforcement);
        assert_eq!(options.extra_includes, vec!["Types.h", "Config"]);
    }

    // ========================================
    // Source classification
    // ========================================

    #[test]
    fn test_from_arg_empty_is_default() {
        assert_eq!(ConfigSource::from_arg("").unwrap(), ConfigSource::Default);
        assert_eq!(ConfigSource::from_arg("  ").unwrap(), ConfigSource::Default);
    }

    #[test]
    fn test_from_arg_yaml_paths() {
        assert_eq!(
            ConfigSource::from_arg("cfg/project.yml").unwrap(),
            ConfigSource::File(PathBuf::from("cfg/project.yml"))
        );
        assert!(matches!(ConfigSource::from_arg("a.yaml"), Ok(ConfigSource::File(_))));
    }

    #[test]
    fn test_from_arg_rejects_other_shapes() {
        let err = ConfigSource::from_arg("options.json").unwrap_err();
        assert!(matches!(err, ConfigError::UnrecognizedSource(ref s) if s == "options.json"));
    }

    #[test]
    fn test_resolve_options_passthrough() {
        let options = GenerationOptions::new().with_coverage_flush(true);
        assert_eq!(ConfigSource::Options(options.clone()).resolve().unwrap(), options);
    }

    #[test]
    fn test_resolve_missing_file() {
        let err = ConfigSource::File(PathBuf::from("/nonexistent/rungen.yml"))
            .resolve()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    // ========================================
    // File parsing
    // ========================================

    #[test]
    fn test_parse_cmock_section_with_symbols() {
        let options = parse(
            ":cmock:\n  :plugins:\n    - :cexception\n  :enforce_strict_ordering: true\n  :includes:\n    - Types.h\n",
        )
        .unwrap();
        assert!(options.enable_exception_wrapper);
        assert!(options.enable_order_enforcement);
        assert!(!options.enable_coverage_flush);
        assert_eq!(options.framework_name, "unity");
        assert_eq!(options.extra_includes, vec!["Types.h"]);
    }

    #[test]
    fn test_parse_unity_section_wins() {
        let options = parse(
            "unity:\n  framework: embunit\n  coverage: 1\ncmock:\n  plugins: [cexception]\n",
        )
        .unwrap();
        assert_eq!(options.framework_name, "embunit");
        assert!(options.enable_coverage_flush);
        assert!(!options.enable_exception_wrapper);
    }

    #[test]
    fn test_parse_framework_symbol_and_single_include() {
        let options = parse(":unity:\n  :framework: :unity\n  :includes: Board.h\n").unwrap();
        assert_eq!(options.framework_name, "unity");
        assert_eq!(options.extra_includes, vec!["Board.h"]);
    }

    #[test]
    fn test_parse_false_and_null_flags_are_off() {
        let options = parse("cmock:\n  coverage: false\n  enforce_strict_ordering: ~\n").unwrap();
        assert!(!options.enable_coverage_flush);
        assert!(!options.enable_order_enforcement);
    }

    #[test]
    fn test_parse_other_plugins_ignored() {
        let options = parse("cmock:\n  plugins: [ignore, callback]\n").unwrap();
        assert!(!options.enable_exception_wrapper);
    }

    #[test]
    fn test_parse_missing_section() {
        let err = parse("other:\n  coverage: true\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingSection { .. }));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let err = parse("cmock: [unclosed\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
