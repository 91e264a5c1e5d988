//! Fuzz target for the comment-annotation extractor.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_annotations
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use tqlgen_schema::extract_annotations;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = extract_annotations(input);
    }
});
