//! Comment annotations attached to type declarations.
//!
//! Annotations are comment lines directly above a type line:
//!
//! ```text
//! # @prefix per
//! # @label(Person record)
//! # @internal
//! entity person, owns name @key;
//! ```
//!
//! They are read from the raw source lines and never reach the tokenizer.

use std::collections::BTreeMap;

use regex_lite::Regex;

use crate::error::SchemaResult;

/// Type name to annotation key/value pairs.
pub type AnnotationMap = BTreeMap<String, BTreeMap<String, String>>;

/// Line patterns for annotation extraction.
pub struct AnnotationScanner {
    annotation: Regex,
    type_line: Regex,
}

impl AnnotationScanner {
    /// Compile the line patterns.
    pub fn new() -> SchemaResult<Self> {
        Ok(Self {
            annotation: Regex::new(r"^#\s*@(\w+)(?:\(([^)]*)\)|\s+(.+))?$")?,
            type_line: Regex::new(r"^(entity|relation|attribute|struct)\s+([\w-]+)")?,
        })
    }

    /// Collect annotations from schema source.
    ///
    /// Annotation lines accumulate until the next other line. If that line
    /// declares a type the pending set is attached to it; blank lines, plain
    /// comments and anything else discard it.
    pub fn scan(&self, source: &str) -> AnnotationMap {
        let mut result = AnnotationMap::new();
        let mut pending: Vec<(String, String)> = Vec::new();

        for line in source.lines() {
            let trimmed = line.trim();

            if let Some(caps) = self.annotation.captures(trimmed) {
                let key = caps.get(1).map_or("", |m| m.as_str());
                let value = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .map_or("", |m| m.as_str().trim());
                pending.push((key.to_string(), value.to_string()));
                continue;
            }

            if pending.is_empty() {
                continue;
            }
            if let Some(caps) = self.type_line.captures(trimmed) {
                if let Some(name) = caps.get(2) {
                    result.insert(name.as_str().to_string(), pending.drain(..).collect());
                }
            }
            pending.clear();
        }

        result
    }
}

/// Collect comment annotations from schema source. See [`AnnotationScanner::scan`].
pub fn extract_annotations(source: &str) -> SchemaResult<AnnotationMap> {
    Ok(AnnotationScanner::new()?.scan(source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn annotations(source: &str) -> AnnotationMap {
        extract_annotations(source).unwrap()
    }

    fn pairs(items: &[(&str, &str)]) -> BTreeMap<String, String> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_all_annotation_forms() {
        let result = annotations(
            "define
            # @prefix per
            # @label(Person record)
            # @internal
            entity person, owns name @key;",
        );
        assert_eq!(
            result["person"],
            pairs(&[("internal", ""), ("label", "Person record"), ("prefix", "per")])
        );
    }

    #[test]
    fn test_every_type_kind() {
        let result = annotations(
            "# @a 1\nattribute name, value string;\n# @b 2\nrelation r, relates x;\n# @c 3\nstruct s, value f string;\n",
        );
        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["name", "r", "s"]);
    }

    #[test]
    fn test_blank_line_discards_pending() {
        let result = annotations("# @prefix per\n\nentity person;\n");
        assert!(result.is_empty());
    }

    #[test]
    fn test_plain_comment_discards_pending() {
        let result = annotations("# @prefix per\n# just a note\nentity person;\n");
        assert!(result.is_empty());
    }

    #[test]
    fn test_other_content_discards_pending() {
        let result = annotations("# @prefix per\ndefine\nentity person;\n");
        assert!(result.is_empty());
    }

    #[test]
    fn test_later_key_wins() {
        let result = annotations("# @prefix a\n# @prefix b\nentity person;\n");
        assert_eq!(result["person"], pairs(&[("prefix", "b")]));
    }

    #[test]
    fn test_unannotated_types_are_absent() {
        let result = annotations("entity person;\n# @x\nentity company;\nentity task;\n");
        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["company"]);
    }

    #[test]
    fn test_hyphenated_names() {
        let result = annotations("# @group hr\nentity person-record sub record;\n");
        assert_eq!(result["person-record"], pairs(&[("group", "hr")]));
    }
}
