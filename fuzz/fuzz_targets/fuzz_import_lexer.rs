//! Fuzz target for import extraction.
//!
//! Extraction must never panic, and every located import must point at a
//! char-aligned span inside the input.
//!
//! ```bash
//! cargo +nightly fuzz run fuzz_import_lexer
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 64 * 1024 {
        return;
    }

    for import in importguard_scan::extract_imports(text) {
        if let Some(range) = import.range {
            assert!(range.start <= range.end && range.end <= text.len());
            assert!(text.is_char_boundary(range.start) && text.is_char_boundary(range.end));
        }
    }
});
