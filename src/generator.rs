//! Runner generation pipeline
//!
//! Ties the scanner, the include resolver and the emitter together and owns the file I/O:
//!
//! 1. Read the test source (size-checked)
//! 2. Discover tests, includes and mocks
//! 3. Emit the runner
//! 4. Write it atomically next to its final location
//! 5. Report every file a build needs for the runner

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rungen_scan::{TestCase, resolve_includes, resolve_mocks, scan};

use crate::backend::runner;
use crate::config::{ConfigSource, GenerationOptions};
use crate::errors::{GenError, GenResult};

/// Maximum test source size (16 MB)
///
/// Test files are hand-written C; anything larger is almost certainly the wrong input.
pub const MAX_SOURCE_SIZE: u64 = 16 * 1024 * 1024;

/// Suffix that replaces `.c` when deriving the runner file name.
pub const RUNNER_SUFFIX: &str = "_Runner.c";

/// What the generator learned about one test source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceAnalysis {
    /// Test functions in discovery order
    pub tests: Vec<TestCase>,
    /// Local includes (without `.h`), in order, duplicates kept
    pub includes: Vec<String>,
    /// Mock modules among the includes
    pub mocks: Vec<String>,
}

impl SourceAnalysis {
    /// Scan `source` for tests, includes and mocks.
    pub fn of(source: &str) -> Self {
        let tests = scan(source);
        let includes = resolve_includes(source);
        let mocks = resolve_mocks(&includes);
        Self { tests, includes, mocks }
    }
}

/// Generates a runner from a test source using fixed options.
#[derive(Debug, Clone, Default)]
pub struct RunnerGenerator {
    options: GenerationOptions,
}

impl RunnerGenerator {
    pub fn new(options: GenerationOptions) -> Self {
        Self { options }
    }

    /// Build a generator from any configuration source. Fails before any source is read.
    pub fn from_config(source: ConfigSource) -> GenResult<Self> {
        Ok(Self::new(source.resolve()?))
    }

    /// Render the runner for already-scanned source.
    pub fn render(&self, analysis: &SourceAnalysis, source_id: &str) -> String {
        runner::emit(&analysis.tests, &analysis.mocks, &self.options, source_id)
    }

    /// Generate `output` from `input` and return the files a build of the runner needs.
    ///
    /// Nothing is written unless the input was read and the runner fully rendered; the output
    /// file appears in one rename.
    #[tracing::instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
    pub fn run(&self, input: &Path, output: &Path) -> GenResult<Vec<PathBuf>> {
        let source = read_source(input)?;
        let analysis = SourceAnalysis::of(&source);

        let module_name = input
            .file_name()
            .map_or_else(|| input.display().to_string(), |n| n.to_string_lossy().into_owned());
        tracing::info!(
            tests = analysis.tests.len(),
            mocks = analysis.mocks.len(),
            "creating test runner for {}",
            module_name
        );

        let code = self.render(&analysis, &input.display().to_string());
        write_atomic(output, &code)?;

        Ok(required_files(input, output, &analysis.includes, &self.options.extra_includes))
    }
}

/// Read a test source, rejecting files over [`MAX_SOURCE_SIZE`].
///
/// Bytes that are not valid UTF-8 (Latin-1 comments are common in embedded code) are replaced
/// rather than rejected. Everything the scanner looks for is ASCII, so discovery is unaffected.
pub fn read_source(path: &Path) -> GenResult<String> {
    let read_err = |source| GenError::Read {
        path: path.to_path_buf(),
        source,
    };
    let metadata = fs::metadata(path).map_err(read_err)?;
    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(GenError::SourceTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max: MAX_SOURCE_SIZE,
        });
    }
    let bytes = fs::read(path).map_err(read_err)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write `contents` to `path` via a temporary file in the same directory.
pub fn write_atomic(path: &Path, contents: &str) -> GenResult<()> {
    let write_err = |source| GenError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".rungen-").suffix(".tmp");
    // Temp files default to owner-only; ask for a regular file mode and let the umask apply.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;

    // An existing runner keeps its mode.
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(write_err)?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Default runner path for a test source: `TestUart.c` → `TestUart_Runner.c`.
///
/// Inputs without a `.c` suffix get the runner suffix appended.
pub fn default_output_path(input: &Path) -> PathBuf {
    let name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let runner_name = match name.strip_suffix(".c") {
        Some(stem) => format!("{}{}", stem, RUNNER_SUFFIX),
        None => format!("{}{}", name, RUNNER_SUFFIX),
    };
    input.with_file_name(runner_name)
}

/// Every file needed to build the runner, de-duplicated with first occurrence kept.
///
/// Order: the input, the output, `<include>.c` for each discovered include, then each extra
/// include exactly as configured.
pub fn required_files(input: &Path, output: &Path, includes: &[String], extra_includes: &[String]) -> Vec<PathBuf> {
    let candidates = [input.to_path_buf(), output.to_path_buf()]
        .into_iter()
        .chain(includes.iter().map(|include| PathBuf::from(format!("{}.c", include))))
        .chain(extra_includes.iter().map(PathBuf::from));

    let mut seen = HashSet::new();
    candidates.filter(|path| seen.insert(path.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("test/TestUart.c")),
            PathBuf::from("test/TestUart_Runner.c")
        );
        assert_eq!(default_output_path(Path::new("TestUart")), PathBuf::from("TestUart_Runner.c"));
        // Only the trailing suffix is replaced.
        assert_eq!(
            default_output_path(Path::new("a.c.d/Test.cfg.c")),
            PathBuf::from("a.c.d/Test.cfg_Runner.c")
        );
    }

    #[test]
    fn test_required_files_order_and_dedup() {
        let files = required_files(
            Path::new("test/TestUart.c"),
            Path::new("test/TestUart_Runner.c"),
            &strings(&["unity", "Uart", "MockSpi", "Uart"]),
            &strings(&["Types.h", "unity.c"]),
        );
        let expected: Vec<PathBuf> = [
            "test/TestUart.c",
            "test/TestUart_Runner.c",
            "unity.c",
            "Uart.c",
            "MockSpi.c",
            "Types.h",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();
        assert_eq!(files, expected);
    }

    #[test]
    fn test_analysis_of_source() {
        let source = "#include \"unity.h\"\n#include \"MockUart.h\"\n\nvoid testSend(void)\n{\n}\n";
        let analysis = SourceAnalysis::of(source);
        assert_eq!(analysis.tests, vec![TestCase::new("testSend", 4)]);
        assert_eq!(analysis.includes, strings(&["unity", "MockUart"]));
        assert_eq!(analysis.mocks, strings(&["MockUart"]));
    }

    #[test]
    fn test_from_config_fails_fast() {
        let err = RunnerGenerator::from_config(ConfigSource::File(PathBuf::from("/nonexistent/x.yml"))).unwrap_err();
        assert!(matches!(err, GenError::Config(_)));
    }

    #[test]
    fn test_read_source_missing_file() {
        let err = read_source(Path::new("/nonexistent/TestNothing.c")).unwrap_err();
        assert!(matches!(err, GenError::Read { .. }));
    }
}
