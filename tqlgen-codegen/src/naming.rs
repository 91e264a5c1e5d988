//! Rust identifiers from schema names.

use std::collections::{BTreeSet, HashMap};

use convert_case::{Case, Casing};

/// Words rendered fully upper-case in type names when acronyms are enabled.
pub const DEFAULT_ACRONYMS: &[&str] = &["id", "url", "uuid", "api", "http", "iid", "nf"];

/// The default acronym table as owned strings (serde default).
pub fn default_acronyms() -> Vec<String> {
    DEFAULT_ACRONYMS.iter().map(|s| s.to_string()).collect()
}

/// Rust keywords that cannot be used as plain identifiers.
const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

/// Check whether a string is a Rust keyword.
pub fn is_keyword(ident: &str) -> bool {
    RUST_KEYWORDS.contains(&ident)
}

/// Converts schema names into type, field and constant identifiers.
#[derive(Debug, Clone, Default)]
pub struct Naming {
    acronyms: Option<BTreeSet<String>>,
}

impl Naming {
    /// Naming without acronym handling.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Naming with an optional acronym table.
    pub fn new(use_acronyms: bool, acronyms: &[String]) -> Self {
        let acronyms = use_acronyms.then(|| acronyms.iter().map(|a| a.to_lowercase()).collect());
        Self { acronyms }
    }

    fn is_acronym(&self, word: &str) -> bool {
        self.acronyms
            .as_ref()
            .is_some_and(|table| table.contains(&word.to_lowercase()))
    }

    /// PascalCase type name, e.g. `user-story` becomes `UserStory` and
    /// `api-key` becomes `APIKey` with acronyms enabled.
    pub fn type_name(&self, name: &str) -> String {
        let mut out = String::new();
        for word in words(name) {
            if self.is_acronym(word) {
                out.push_str(&word.to_uppercase());
            } else {
                out.push_str(&word.to_case(Case::Pascal));
            }
        }
        let out = leading_alpha(out, "T");
        if is_keyword(&out) {
            format!("{out}_")
        } else {
            out
        }
    }

    /// snake_case field name with Rust keywords escaped.
    pub fn field_name(&self, name: &str) -> String {
        let joined = words(name)
            .map(|w| w.to_case(Case::Snake))
            .collect::<Vec<_>>()
            .join("_");
        escape_keyword(leading_alpha(joined, "_"))
    }

    /// SCREAMING_SNAKE_CASE constant name with a prefix, e.g. `TYPE_USER_STORY`.
    pub fn const_name(&self, prefix: &str, name: &str) -> String {
        let joined = words(prefix)
            .chain(words(name))
            .map(|w| w.to_case(Case::UpperSnake))
            .collect::<Vec<_>>()
            .join("_");
        leading_alpha(joined, "_")
    }

    /// PascalCase enum variant for an enumerated value.
    pub fn variant_name(&self, value: &str) -> String {
        let mut out: String = words(value).map(|w| w.to_case(Case::Pascal)).collect();
        if out.is_empty() {
            return "Empty".to_string();
        }
        if out.starts_with(|c: char| c.is_ascii_digit()) {
            out.insert(0, 'V');
        }
        if is_keyword(&out) {
            out.push('_');
        }
        out
    }
}

/// Alphanumeric runs of a name.
fn words(name: &str) -> impl Iterator<Item = &str> {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
}

/// Prefix an identifier that is empty or starts with a digit.
fn leading_alpha(ident: String, prefix: &str) -> String {
    match ident.chars().next() {
        Some(c) if !c.is_ascii_digit() => ident,
        _ => format!("{prefix}{ident}"),
    }
}

/// Escape a keyword as a raw identifier, or with a trailing underscore where
/// a raw identifier is not allowed.
pub fn escape_keyword(ident: String) -> String {
    if NON_RAW_KEYWORDS.contains(&ident.as_str()) {
        format!("{ident}_")
    } else if is_keyword(&ident) {
        format!("r#{ident}")
    } else {
        ident
    }
}

/// Make every name in the list unique by appending a counter to repeats.
pub fn dedupe(names: &mut [String]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for name in names.iter_mut() {
        let count = seen.entry(name.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            let mut n = *count;
            let mut candidate = format!("{name}{n}");
            while seen.contains_key(&candidate) {
                n += 1;
                candidate = format!("{name}{n}");
            }
            seen.insert(candidate.clone(), 1);
            *name = candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acronyms() -> Naming {
        Naming::new(true, &default_acronyms())
    }

    #[test]
    fn test_type_name_splits_on_separators() {
        let naming = Naming::plain();
        assert_eq!(naming.type_name("user-story"), "UserStory");
        assert_eq!(naming.type_name("start_date"), "StartDate");
        assert_eq!(naming.type_name("person"), "Person");
    }

    #[test]
    fn test_type_name_with_acronyms() {
        let naming = acronyms();
        assert_eq!(naming.type_name("api-key"), "APIKey");
        assert_eq!(naming.type_name("user-id"), "UserID");
        assert_eq!(naming.type_name("home-url"), "HomeURL");
        assert_eq!(Naming::plain().type_name("user-id"), "UserId");
    }

    #[test]
    fn test_custom_acronym_table() {
        let naming = Naming::new(true, &["sku".to_string()]);
        assert_eq!(naming.type_name("product-sku"), "ProductSKU");
        assert_eq!(naming.type_name("user-id"), "UserId");
    }

    #[test]
    fn test_type_name_leading_digit() {
        assert_eq!(Naming::plain().type_name("3-model"), "T3Model");
    }

    #[test]
    fn test_field_name() {
        let naming = acronyms();
        assert_eq!(naming.field_name("start-date"), "start_date");
        assert_eq!(naming.field_name("name"), "name");
        assert_eq!(naming.field_name("ID"), "id");
    }

    #[test]
    fn test_field_name_escapes_keywords() {
        let naming = Naming::plain();
        assert_eq!(naming.field_name("type"), "r#type");
        assert_eq!(naming.field_name("match"), "r#match");
        assert_eq!(naming.field_name("self"), "self_");
        assert_eq!(naming.field_name("crate"), "crate_");
    }

    #[test]
    fn test_const_name() {
        let naming = Naming::plain();
        assert_eq!(naming.const_name("TYPE", "user-story"), "TYPE_USER_STORY");
        assert_eq!(naming.const_name("REL", "employment"), "REL_EMPLOYMENT");
        assert_eq!(naming.const_name("", "person"), "PERSON");
        assert_eq!(naming.const_name("status", "in progress"), "STATUS_IN_PROGRESS");
    }

    #[test]
    fn test_variant_name() {
        let naming = Naming::plain();
        assert_eq!(naming.variant_name("in-progress"), "InProgress");
        assert_eq!(naming.variant_name("done"), "Done");
        assert_eq!(naming.variant_name(""), "Empty");
        assert_eq!(naming.variant_name("self"), "Self_");
        assert_eq!(naming.variant_name("2"), "V2");
    }

    #[test]
    fn test_dedupe() {
        let mut names = vec![
            "Active".to_string(),
            "Active".to_string(),
            "Other".to_string(),
            "Active".to_string(),
        ];
        dedupe(&mut names);
        assert_eq!(names, vec!["Active", "Active2", "Other", "Active3"]);
    }

    #[test]
    fn test_keyword_detection() {
        assert!(is_keyword("type"));
        assert!(is_keyword("Self"));
        assert!(!is_keyword("person"));
    }
}
