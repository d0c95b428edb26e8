//! Include and mock discovery.
//!
//! Only local includes of the form `#include "NAME.h"` are considered. The directive has to start
//! in column one; angle-bracket includes are ignored. Mock modules are the includes whose base name
//! starts with `mock` in any letter case (`MockUart`, `mock_spi`, `MOCKbus`).

/// Prefix (compared case-insensitively) that marks an include as a generated mock.
pub const MOCK_PREFIX: &str = "mock";

const INCLUDE_DIRECTIVE: &str = "#include";

/// Collect the names of all local header includes in `source`, without the `.h` suffix.
///
/// Order and duplicates are preserved exactly as they appear. Path components are kept
/// (`#include "drivers/uart.h"` yields `drivers/uart`). Comments are not stripped first, so a
/// directive inside a block comment still counts.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn resolve_includes(source: &str) -> Vec<String> {
    source.lines().filter_map(parse_include).map(str::to_string).collect()
}

/// Filter `includes` down to mock modules, returning their base names in order.
pub fn resolve_mocks(includes: &[String]) -> Vec<String> {
    includes
        .iter()
        .map(|include| base_name(include))
        .filter(|base| is_mock(base))
        .inspect(|mock| tracing::debug!(mock = %mock, "discovered mock module"))
        .map(str::to_string)
        .collect()
}

/// Whether a header base name follows the mock naming convention.
pub fn is_mock(base: &str) -> bool {
    base.get(..MOCK_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(MOCK_PREFIX))
}

/// Last path component of an include name.
pub fn base_name(include: &str) -> &str {
    include.rsplit('/').next().unwrap_or(include)
}

/// Parse one line as a local include, returning the name between the quotes minus `.h`.
///
/// When the line holds more than one quote, the name runs to the last `.h"` on the line.
fn parse_include(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(INCLUDE_DIRECTIVE)?;
    let after_ws = rest.trim_start();
    if after_ws.len() == rest.len() {
        return None;
    }
    let quoted = after_ws.strip_prefix('"')?;

    quoted
        .match_indices('"')
        .rev()
        .find_map(|(close, _)| {
            let name = quoted[..close].trim_end().strip_suffix(".h")?.trim_start();
            (!name.is_empty()).then_some(name)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_local_includes_in_order_with_duplicates() {
        let source = "\
#include \"unity.h\"
#include <stdio.h>
#include \"Uart.h\"
#include \"MockSpi.h\"
#include \"Uart.h\"
";
        assert_eq!(resolve_includes(source), strings(&["unity", "Uart", "MockSpi", "Uart"]));
    }

    #[test]
    fn test_include_shape_is_strict() {
        let source = "\
  #include \"indented.h\"
#include\"nospace.h\"
#include \"source.c\"
#include \".h\"
#define INCLUDE \"x.h\"
";
        assert!(resolve_includes(source).is_empty());
    }

    #[test]
    fn test_include_tolerates_inner_padding_and_paths() {
        let source = "#include   \" drivers/adc.h \"\n";
        assert_eq!(resolve_includes(source), strings(&["drivers/adc"]));
    }

    #[test]
    fn test_include_with_trailing_comment() {
        assert_eq!(resolve_includes("#include \"Led.h\" // status led\n"), strings(&["Led"]));
    }

    #[test]
    fn test_include_inside_block_comment_still_counts() {
        assert_eq!(resolve_includes("/*\n#include \"Old.h\"\n*/\n"), strings(&["Old"]));
    }

    #[test]
    fn test_mocks_any_case() {
        let includes = strings(&["unity", "MockUart", "mock_spi", "MOCKbus", "Mocha", "Uart"]);
        assert_eq!(resolve_mocks(&includes), strings(&["MockUart", "mock_spi", "MOCKbus"]));
    }

    #[test]
    fn test_mocks_use_base_name() {
        let includes = strings(&["mocks/Uart", "generated/MockAdc"]);
        assert_eq!(resolve_mocks(&includes), strings(&["MockAdc"]));
    }

    #[test]
    fn test_no_mocks() {
        assert!(resolve_mocks(&strings(&["unity", "Foo"])).is_empty());
    }

    #[test]
    fn test_is_mock_short_names() {
        assert!(!is_mock("moc"));
        assert!(is_mock("mock"));
    }
}
