//! Source scanning for the rungen test-runner generator.
//!
//! This crate reads C test sources and reports what the runner needs to know about them:
//! which test functions exist (and where), and which local headers they include.
//!
//! ## Notes
//! - This is deliberately not a C parser. The scanner recognizes exactly one signature shape,
//!   `void testName(void)`, after stripping comments and cutting the text at statement boundaries.
//! - Everything here is a pure function of the input text; file I/O belongs to the caller.
//!
//! ## Examples
//! ```rust
//! use rungen_scan::{includes, scanner};
//!
//! let source = "#include \"MockUart.h\"\n\nvoid testSend(void)\n{\n}\n";
//! let tests = scanner::scan(source);
//! assert_eq!(tests[0].name, "testSend");
//! assert_eq!(tests[0].line_number, 3);
//!
//! let headers = includes::resolve_includes(source);
//! assert_eq!(includes::resolve_mocks(&headers), vec!["MockUart".to_string()]);
//! ```

pub mod includes;
pub mod scanner;
pub mod scrub;

pub use includes::{resolve_includes, resolve_mocks};
pub use scanner::{TestCase, scan};
