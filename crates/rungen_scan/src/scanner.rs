//! Test discovery.
//!
//! `scan` finds every `void test<Name>(void)` signature in a C source and pairs it with the line it
//! appears on in the original text.
//!
//! ## Pipeline
//!
//! 1. Strip comments (see [`crate::scrub`]) from a working copy.
//! 2. Cut the copy into segments at `;`, `{`, `}` and preprocessor lines.
//! 3. Match the signature shape at the start of any line in each segment (first match wins).
//! 4. Attribute line numbers by walking the *original* text with a cursor that never moves back.
//!
//! Step 4 has to be a single forward walk: `testFoo` is a substring of `testFooExtended`, so looking
//! every name up from the top of the file would land later tests on earlier lines.

use crate::scrub::strip_comments;

/// Prefix every test function name starts with.
pub const TEST_PREFIX: &str = "test";

/// A discovered test function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestCase {
    /// Full function name, including the `test` prefix.
    pub name: String,
    /// 1-based line in the original (unstripped) source.
    pub line_number: usize,
}

impl TestCase {
    pub fn new(name: impl Into<String>, line_number: usize) -> Self {
        Self {
            name: name.into(),
            line_number,
        }
    }
}

/// Discover test functions in `source`, in first-occurrence order.
///
/// Empty input, or input with no matching signature, yields an empty list. Names are not
/// de-duplicated: a prototype followed by its definition is reported twice.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn scan(source: &str) -> Vec<TestCase> {
    let scrubbed = strip_comments(source);
    let names: Vec<&str> = split_segments(&scrubbed)
        .into_iter()
        .filter_map(match_segment)
        .collect();
    tracing::debug!(count = names.len(), "matched test signatures");
    attribute_lines(source, &names)
}

/// Pair each name with its line in `source`, advancing a shared cursor.
///
/// The lookup for a name starts at the line where the previous name was found (that line included),
/// and the match is a plain substring test. A name that cannot be found at or after the cursor is
/// dropped.
pub fn attribute_lines(source: &str, names: &[&str]) -> Vec<TestCase> {
    let lines: Vec<&str> = source.lines().collect();
    let mut cursor = 0;
    let mut found = Vec::with_capacity(names.len());

    for &name in names {
        let hit = lines
            .iter()
            .enumerate()
            .skip(cursor)
            .find(|(_, line)| line.contains(name));
        match hit {
            Some((idx, _)) => {
                cursor = idx;
                tracing::debug!(test = name, line = idx + 1, "discovered test");
                found.push(TestCase::new(name, idx + 1));
            }
            None => {
                tracing::warn!(test = name, from_line = cursor + 1, "test name not found in original source");
            }
        }
    }

    found
}

/// Split scrubbed text into logical segments.
///
/// `;`, `{` and `}` end a segment, and a line whose first non-blank character is `#` is a segment
/// boundary in its own right. Boundaries are not returned; a directive can never hold a signature.
pub fn split_segments(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;
    let mut line_start = true;

    while i < bytes.len() {
        if line_start {
            line_start = false;
            let mut j = i;
            while j < bytes.len() && is_inline_space(bytes[j]) {
                j += 1;
            }
            if j < bytes.len() && bytes[j] == b'#' {
                let end = text[j..].find('\n').map_or(bytes.len(), |eol| j + eol);
                segments.push(&text[start..i]);
                start = end;
                i = end;
                continue;
            }
        }
        match bytes[i] {
            b';' | b'{' | b'}' => {
                segments.push(&text[start..i]);
                start = i + 1;
            }
            b'\n' => line_start = true,
            _ => {}
        }
        i += 1;
    }
    segments.push(&text[start..]);
    segments
}

/// Find the first signature in a segment, trying each line start in turn.
fn match_segment(segment: &str) -> Option<&str> {
    std::iter::once(0)
        .chain(segment.match_indices('\n').map(|(idx, _)| idx + 1))
        .find_map(|at| match_signature(&segment[at..]))
}

/// Match `\s* void \s+ test<ident> \s* ( \s* void \s* )` at the start of `text`.
///
/// Returns the function name (`test` plus the identifier remainder, which may be empty).
pub fn match_signature(text: &str) -> Option<&str> {
    let mut cur = Cursor::new(text);
    cur.skip_space();
    cur.keyword("void")?;
    if cur.skip_space() == 0 {
        return None;
    }
    let name_start = cur.pos;
    cur.keyword(TEST_PREFIX)?;
    cur.skip_ident();
    let name_end = cur.pos;
    cur.skip_space();
    cur.byte(b'(')?;
    cur.skip_space();
    cur.keyword("void")?;
    cur.skip_space();
    cur.byte(b')')?;
    Some(&text[name_start..name_end])
}

/// Byte cursor over a candidate signature.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a [u8] {
        &self.text.as_bytes()[self.pos..]
    }

    /// Skip whitespace, newlines included. Returns how many bytes were skipped.
    fn skip_space(&mut self) -> usize {
        let n = self.rest().iter().take_while(|b| is_c_space(**b)).count();
        self.pos += n;
        n
    }

    fn skip_ident(&mut self) {
        self.pos += self.rest().iter().take_while(|b| is_ident_continue(**b)).count();
    }

    fn keyword(&mut self, word: &str) -> Option<()> {
        if self.rest().starts_with(word.as_bytes()) {
            self.pos += word.len();
            Some(())
        } else {
            None
        }
    }

    fn byte(&mut self, b: u8) -> Option<()> {
        if self.rest().first() == Some(&b) {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }
}

fn is_c_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn is_inline_space(b: u8) -> bool {
    is_c_space(b) && b != b'\n'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
