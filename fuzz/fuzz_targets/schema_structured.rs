//! Structured fuzzing for schema parsing and inheritance.
//!
//! Generates well-formed `define` blocks with random hierarchies, ownership
//! and roles. Parsing must succeed, accumulation must either succeed or
//! report a cycle, and a second accumulation must change nothing.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_schema_structured
//! ```

#![no_main]

use std::fmt::Write;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tqlgen_codegen::{Generator, Target, TqlgenConfig};
use tqlgen_schema::{SchemaError, parse_schema};

const ATTRIBUTES: [&str; 4] = ["name", "start-date", "score", "status"];
const VALUE_TYPES: [&str; 4] = ["string", "datetime", "double", "string"];
const TYPES: [&str; 5] = ["thing-a", "thing-b", "thing-c", "thing-d", "thing-e"];
const ROLES: [&str; 3] = ["left", "right", "witness"];

/// A generated cardinality annotation.
#[derive(Debug, Arbitrary)]
enum FuzzCard {
    None,
    Key,
    Unique,
    Exactly(u8),
    Range(u8, Option<u8>),
}

impl FuzzCard {
    fn render(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Key => " @key".to_string(),
            Self::Unique => " @unique".to_string(),
            Self::Exactly(n) => format!(" @card({})", n % 4),
            Self::Range(min, Some(max)) => format!(" @card({}..{})", min % 3, max % 5),
            Self::Range(min, None) => format!(" @card({}..)", min % 3),
        }
    }
}

/// A generated entity or relation.
#[derive(Debug, Arbitrary)]
struct FuzzThing {
    relation: bool,
    is_abstract: bool,
    parent: Option<u8>,
    owns: Vec<(u8, FuzzCard)>,
    plays: Vec<(u8, u8)>,
    relates: Vec<u8>,
}

#[derive(Debug, Arbitrary)]
struct FuzzSchema {
    things: Vec<FuzzThing>,
}

impl FuzzSchema {
    fn to_typeql(&self) -> String {
        let mut out = String::from("define\n");
        for (name, value) in ATTRIBUTES.iter().zip(VALUE_TYPES) {
            let _ = writeln!(out, "attribute {name}, value {value};");
        }

        for (i, thing) in self.things.iter().take(TYPES.len()).enumerate() {
            let kind = if thing.relation { "relation" } else { "entity" };
            let _ = write!(out, "{kind} {}", TYPES[i]);
            if let Some(parent) = thing.parent {
                let _ = write!(out, " sub {}", TYPES[parent as usize % TYPES.len()]);
            }
            if thing.is_abstract {
                out.push_str(" @abstract");
            }

            let mut clauses = Vec::new();
            for (attribute, card) in thing.owns.iter().take(4) {
                let attribute = ATTRIBUTES[*attribute as usize % ATTRIBUTES.len()];
                clauses.push(format!("owns {attribute}{}", card.render()));
            }
            for (relation, role) in thing.plays.iter().take(3) {
                let relation = TYPES[*relation as usize % TYPES.len()];
                let role = ROLES[*role as usize % ROLES.len()];
                clauses.push(format!("plays {relation}:{role}"));
            }
            if thing.relation {
                for role in thing.relates.iter().take(3) {
                    clauses.push(format!("relates {}", ROLES[*role as usize % ROLES.len()]));
                }
            }

            if !clauses.is_empty() {
                let _ = write!(out, ", {}", clauses.join(", "));
            }
            out.push_str(";\n");
        }
        out
    }
}

fuzz_target!(|input: FuzzSchema| {
    let source = input.to_typeql();
    let mut schema = match parse_schema(&source) {
        Ok(schema) => schema,
        Err(e) => panic!("generated schema failed to parse: {e}\n{source}"),
    };

    match schema.accumulate_inheritance() {
        Ok(()) => {}
        Err(SchemaError::CyclicInheritance { .. }) => return,
        Err(e) => panic!("unexpected accumulation error: {e}\n{source}"),
    }

    let once = schema.clone();
    if schema.accumulate_inheritance().is_err() || schema != once {
        panic!("accumulation is not idempotent\n{source}");
    }

    let config = TqlgenConfig::default();
    let generator = Generator::new(&config);
    for target in Target::ALL {
        if let Err(e) = generator.render(&schema, &source, target) {
            panic!("{target} failed to render: {e}\n{source}");
        }
    }
});
