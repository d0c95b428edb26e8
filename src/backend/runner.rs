//! Runner emitter - composes the generated test runner
//!
//! The runner is one C translation unit, written in this order:
//!
//! 1. "generated, do not edit" marker
//! 2. includes (framework, mock support, extras, setjmp/stdio, CException, coverage, mocks)
//! 3. the shared failure-message buffer, plus order-tracking globals when enabled
//! 4. extern declarations for the fixtures and every discovered test
//! 5. `CMock_Init` / `CMock_Verify` / `CMock_Destroy`, only when mocks are in use
//! 6. `runTest` (the protected execution protocol) and `resetTest`
//! 7. `main`, which runs every test in discovery order
//!
//! ## Execution protocol
//!
//! Each `RUN_TEST` goes through `runTest`:
//!
//! ```text
//! START → [CMock_Init] → setUp → test → [CMock_Verify] → [CMock_Destroy] → [tearDown] → DONE
//!         └──────────── first TEST_PROTECT ────────────┘                  └ own TEST_PROTECT ┘
//! ```
//!
//! `TEST_PROTECT` is the framework's setjmp-based recovery point, so a failed assertion anywhere in
//! the first group jumps back into `runTest` instead of ending the process. `CMock_Destroy` sits
//! outside both groups: it runs after any failure above it, and a fault inside it is not caught.
//! `tearDown` is skipped for ignored tests and fails on its own account.
//!
//! Emission is a pure function of its inputs: same tests, mocks, options and source name in, same
//! bytes out.

use rungen_scan::TestCase;

use super::c_emitter::{CEmitter, c_string_literal, header_stem};
use crate::config::GenerationOptions;

/// First line of every generated runner.
pub const GENERATED_MARKER: &str = "AUTOGENERATED FILE. DO NOT EDIT.";

/// Size of the shared failure-message buffer.
pub const MESSAGE_BUFFER_SIZE: usize = 50;

const MOCK_SUPPORT_HEADER: &str = "cmock";
const EXCEPTION_HEADER: &str = "CException";
const COVERAGE_HEADER: &str = "BullseyeCoverage";
const EXCEPTION_MESSAGE: &str = "Unhandled Exception!";

const MOCK_INIT: &str = "CMock_Init";
const MOCK_VERIFY: &str = "CMock_Verify";
const MOCK_DESTROY: &str = "CMock_Destroy";
const SET_UP: &str = "setUp";
const TEAR_DOWN: &str = "tearDown";

/// Generate the runner source for one test file.
///
/// `source_id` is recorded in the runner for failure reports, usually the test file path.
#[tracing::instrument(skip_all, fields(tests = tests.len(), mocks = mocks.len(), source = source_id))]
pub fn emit(tests: &[TestCase], mocks: &[String], options: &GenerationOptions, source_id: &str) -> String {
    RunnerEmitter::new(options, mocks).emit(tests, source_id)
}

/// Runner generation state for one set of options and mocks.
pub struct RunnerEmitter<'a> {
    options: &'a GenerationOptions,
    mocks: &'a [String],
    out: CEmitter,
}

impl<'a> RunnerEmitter<'a> {
    pub fn new(options: &'a GenerationOptions, mocks: &'a [String]) -> Self {
        Self {
            options,
            mocks,
            out: CEmitter::new(),
        }
    }

    fn has_mocks(&self) -> bool {
        !self.mocks.is_empty()
    }

    /// Write every section and return the finished source.
    pub fn emit(mut self, tests: &[TestCase], source_id: &str) -> String {
        self.emit_header();
        self.out.blank_line();
        self.emit_globals();
        self.out.blank_line();
        self.emit_externs(tests);
        self.out.blank_line();
        if self.has_mocks() {
            self.emit_mock_management();
        }
        self.emit_run_test();
        self.out.blank_line();
        self.emit_reset_test();
        self.out.blank_line();
        self.emit_main(tests, source_id);
        self.out.finish()
    }

    fn emit_header(&mut self) {
        let options = self.options;
        self.out.block_comment(GENERATED_MARKER);
        self.out.include_local(&format!("{}.h", options.framework_name));
        if self.has_mocks() {
            self.out.include_local(&format!("{}.h", MOCK_SUPPORT_HEADER));
        }
        for include in &options.extra_includes {
            self.out.include_local(&format!("{}.h", header_stem(include)));
        }
        self.out.include_system("setjmp.h");
        self.out.include_system("stdio.h");
        if options.enable_exception_wrapper {
            self.out.include_local(&format!("{}.h", EXCEPTION_HEADER));
        }
        if options.enable_coverage_flush {
            self.out.include_local(&format!("{}.h", COVERAGE_HEADER));
        }
        for mock in self.mocks {
            self.out.include_local(&format!("{}.h", mock));
        }
    }

    fn emit_globals(&mut self) {
        self.out.linef(format_args!("char MessageBuffer[{}];", MESSAGE_BUFFER_SIZE));
        if self.options.enable_order_enforcement {
            self.out.line("int GlobalExpectCount;");
            self.out.line("int GlobalVerifyOrder;");
            self.out.line("char* GlobalOrderError;");
        }
    }

    fn emit_externs(&mut self, tests: &[TestCase]) {
        self.out.extern_void_fn(SET_UP);
        self.out.extern_void_fn(TEAR_DOWN);
        if !tests.is_empty() {
            self.out.blank_line();
            for test in tests {
                self.out.extern_void_fn(&test.name);
            }
        }
    }

    fn emit_mock_management(&mut self) {
        let mocks = self.mocks;
        let order = self.options.enable_order_enforcement;

        self.out.function("static", "void", MOCK_INIT, "", |out| {
            if order {
                out.line("GlobalExpectCount = 0;");
                out.line("GlobalVerifyOrder = 0;");
                out.line("GlobalOrderError = NULL;");
            }
            for mock in mocks {
                out.call(&format!("{}_Init", mock));
            }
        });
        self.out.blank_line();

        for (wrapper, hook) in [(MOCK_VERIFY, "Verify"), (MOCK_DESTROY, "Destroy")] {
            self.out.function("static", "void", wrapper, "", |out| {
                for mock in mocks {
                    out.call(&format!("{}_{}", mock, hook));
                }
            });
            self.out.blank_line();
        }
    }

    fn emit_run_test(&mut self) {
        let has_mocks = self.has_mocks();
        let exceptions = self.options.enable_exception_wrapper;

        self.out.function("static", "void", "runTest", "UnityTestFunction test", |out| {
            out.block("if (TEST_PROTECT())", |out| {
                let protected_body = |out: &mut CEmitter| {
                    if has_mocks {
                        out.call(MOCK_INIT);
                    }
                    out.call(SET_UP);
                    out.call("test");
                    if has_mocks {
                        out.call(MOCK_VERIFY);
                    }
                };
                if exceptions {
                    out.line("CEXCEPTION_T e;");
                    out.line("Try {");
                    out.indent();
                    protected_body(out);
                    out.dedent();
                    out.inline_block("} Catch(e)", |out| {
                        out.linef(format_args!(
                            "TEST_ASSERT_EQUAL_HEX32_MESSAGE(CEXCEPTION_NONE, e, {});",
                            c_string_literal(EXCEPTION_MESSAGE)
                        ));
                    });
                } else {
                    protected_body(out);
                }
            });
            if has_mocks {
                out.call(MOCK_DESTROY);
            }
            out.block("if (TEST_PROTECT() && !TEST_IS_IGNORED)", |out| {
                out.call(TEAR_DOWN);
            });
        });
    }

    fn emit_reset_test(&mut self) {
        let has_mocks = self.has_mocks();

        self.out.function("", "void", "resetTest", "", |out| {
            if has_mocks {
                out.call(MOCK_VERIFY);
                out.call(MOCK_DESTROY);
            }
            out.call(TEAR_DOWN);
            if has_mocks {
                out.call(MOCK_INIT);
            }
            out.call(SET_UP);
        });
    }

    fn emit_main(&mut self, tests: &[TestCase], source_id: &str) {
        let coverage = self.options.enable_coverage_flush;

        self.out.function("", "int", "main", "", |out| {
            out.linef(format_args!("Unity.TestFile = {};", c_string_literal(source_id)));
            out.line("UnityBegin();");
            if !tests.is_empty() {
                out.blank_line();
                out.comment("RUN_TEST calls runTest");
                for test in tests {
                    out.linef(format_args!("RUN_TEST({}, {});", test.name, test.line_number));
                }
            }
            out.blank_line();
            out.line("UnityEnd();");
            if coverage {
                out.line("cov_write();");
            }
            out.line("return 0;");
        });
    }
}
