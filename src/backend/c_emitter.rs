//! C code emitter - builds C source text line by line
//!
//! This module provides a small buffer with indentation tracking and helpers for the handful of C
//! constructs the runner needs: includes, declarations, functions and braced blocks.

use std::fmt::Write;

/// A buffer for building C source code with consistent indentation
#[derive(Debug)]
pub struct CEmitter {
    buffer: String,
    indent_level: usize,
    indent_str: &'static str,
}

impl Default for CEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl CEmitter {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_str: "  ", // 2 spaces, matching hand-written runners
        }
    }

    /// Get the generated code
    pub fn finish(self) -> String {
        self.buffer
    }

    /// Write a line with current indentation
    pub fn line(&mut self, s: &str) {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
    }

    /// Write a formatted line with current indentation
    pub fn linef(&mut self, args: std::fmt::Arguments<'_>) {
        self.write_indent();
        let _ = self.buffer.write_fmt(args);
        self.buffer.push('\n');
    }

    /// Write a blank line
    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
    }

    /// Write indentation only
    pub fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent_str);
        }
    }

    /// Increase indent level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indent level
    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Write a block with the opening brace on its own line:
    ///
    /// ```c
    /// header
    /// {
    ///   ...
    /// }
    /// ```
    pub fn block<F>(&mut self, header: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.line(header);
        self.line("{");
        self.indent();
        f(self);
        self.dedent();
        self.line("}");
    }

    /// Write a block with the opening brace on the header line (`Try {`).
    pub fn inline_block<F>(&mut self, header: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.line(&format!("{} {{", header));
        self.indent();
        f(self);
        self.dedent();
        self.line("}");
    }

    /// Write a function definition. An empty `params` list becomes `void`.
    pub fn function<F>(&mut self, storage: &str, return_type: &str, name: &str, params: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let params = if params.is_empty() { "void" } else { params };
        let header = if storage.is_empty() {
            format!("{} {}({})", return_type, name, params)
        } else {
            format!("{} {} {}({})", storage, return_type, name, params)
        };
        self.block(&header, f);
    }

    /// Write an `extern void name(void);` declaration
    pub fn extern_void_fn(&mut self, name: &str) {
        self.linef(format_args!("extern void {}(void);", name));
    }

    /// Write a call statement with no arguments
    pub fn call(&mut self, name: &str) {
        self.linef(format_args!("{}();", name));
    }

    /// Write a local include (`#include "name.h"`)
    pub fn include_local(&mut self, header: &str) {
        self.linef(format_args!("#include \"{}\"", header));
    }

    /// Write a system include (`#include <name.h>`)
    pub fn include_system(&mut self, header: &str) {
        self.linef(format_args!("#include <{}>", header));
    }

    /// Write a block comment on one line
    pub fn block_comment(&mut self, text: &str) {
        self.linef(format_args!("/* {} */", text));
    }

    /// Write a line comment
    pub fn comment(&mut self, text: &str) {
        self.linef(format_args!("// {}", text));
    }
}

/// Quote `text` as a C string literal.
pub fn c_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Drop a caller-supplied `.h` suffix so it can be re-appended uniformly.
pub fn header_stem(name: &str) -> &str {
    name.strip_suffix(".h").unwrap_or(name)
}
