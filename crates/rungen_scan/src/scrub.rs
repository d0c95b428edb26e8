//! Comment stripping.
//!
//! Two passes over the text, in this order:
//! 1. every `//` through the end of its line is removed (the newline itself stays);
//! 2. every `/* ... */` is removed, matching each opener with the nearest closer (no nesting).
//!
//! String and character literals get no special treatment, so `"http://host"` loses its tail and a
//! `/*` hidden behind a line comment is gone before the block pass runs. Runner output for existing
//! test suites depends on this exact behavior.

/// Remove line and block comments from `source`.
///
/// Line structure is preserved for line comments only: a removed block comment takes its newlines
/// with it. Callers that need true line numbers must look them up in the original text.
pub fn strip_comments(source: &str) -> String {
    strip_block_comments(&strip_line_comments(source))
}

fn strip_line_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find("//") {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        rest = match rest.find('\n') {
            Some(eol) => &rest[eol..],
            None => "",
        };
    }
    out.push_str(rest);
    out
}

fn strip_block_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find("/*") {
        let Some(len) = rest[start + 2..].find("*/") else {
            // Unterminated: left in place.
            break;
        };
        out.push_str(&rest[..start]);
        rest = &rest[start + 2 + len + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comment_removed_newline_kept() {
        assert_eq!(strip_comments("int a; // note\nint b;"), "int a; \nint b;");
    }

    #[test]
    fn test_line_comment_at_end_of_input() {
        assert_eq!(strip_comments("x // trailing"), "x ");
    }

    #[test]
    fn test_block_comment_spanning_lines() {
        assert_eq!(strip_comments("a /* one\ntwo */ b"), "a  b");
    }

    #[test]
    fn test_block_comments_do_not_nest() {
        assert_eq!(strip_comments("/* outer /* inner */ tail */"), " tail */");
    }

    #[test]
    fn test_unterminated_block_comment_is_kept() {
        assert_eq!(strip_comments("a /* never closed"), "a /* never closed");
    }

    #[test]
    fn test_line_pass_runs_before_block_pass() {
        // The `//` inside the block comment eats its closer, so the block runs on to the next `*/`.
        let source = "/* a // b */\nvoid testKept(void);\n/* c */ d";
        assert_eq!(strip_comments(source), " d");
    }

    #[test]
    fn test_string_literals_are_not_special() {
        assert_eq!(strip_comments("char* u = \"http://host\";\n"), "char* u = \"http:\n");
    }

    #[test]
    fn test_slash_star_slash_is_not_a_complete_comment() {
        assert_eq!(strip_comments("/*/ x */y"), "y");
    }
}
