#![no_main]

use libfuzzer_sys::fuzz_target;
use rungen::{GenerationOptions, SourceAnalysis, emit};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        let analysis = SourceAnalysis::of(s);
        for test in &analysis.tests {
            assert!(test.name.starts_with("test"));
            assert!(test.line_number >= 1);
        }
        let _ = emit(&analysis.tests, &analysis.mocks, &GenerationOptions::default(), "fuzz.c");
    }
});
