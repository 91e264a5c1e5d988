//! Fuzz target for the TypeQL schema parser.
//!
//! Feeds arbitrary text through parsing, inheritance accumulation and every
//! generator. Each stage may return an error but must never panic.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_schema_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use tqlgen_codegen::{Generator, Target, TqlgenConfig};
use tqlgen_schema::parse_schema;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(mut schema) = parse_schema(input) else {
        return;
    };
    let _ = schema.accumulate_inheritance();

    let config = TqlgenConfig::default();
    let generator = Generator::new(&config);
    for target in Target::ALL {
        let _ = generator.render(&schema, input, target);
    }
});
