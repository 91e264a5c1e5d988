//! Data-model template.

use std::fmt::Write;

use super::{DATA_DERIVES, str_slice, trim_trailing_blank, write_header, write_struct};
use crate::builders::{EnumView, ModelView, TypeView};
use crate::error::CodegenResult;

/// Renders a [`ModelView`] as plain serde data types.
#[derive(Debug, Clone)]
pub struct ModelTemplate {
    pub header: bool,
}

impl Default for ModelTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelTemplate {
    pub fn new() -> Self {
        Self { header: true }
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn render(&self, view: &ModelView) -> CodegenResult<String> {
        let mut out = String::new();
        write_header(&mut out, self.header, &view.module_name)?;

        if let Some(version) = &view.schema_version {
            writeln!(out, "/// Version of the schema these types were generated from.")?;
            writeln!(out, "pub const SCHEMA_VERSION: &str = {version:?};")?;
            writeln!(out)?;
        }

        for e in &view.enums {
            write_enum(&mut out, e)?;
        }

        for s in &view.structs {
            let doc = [format!("Struct `{}`.", s.type_name)];
            write_struct(&mut out, &doc, DATA_DERIVES, &s.ident, &s.fields)?;
            writeln!(out)?;
        }

        for t in &view.entities {
            write_type(&mut out, "entity", t)?;
        }
        for t in &view.relations {
            write_type(&mut out, "relation", t)?;
        }

        trim_trailing_blank(&mut out);
        Ok(out)
    }
}

fn write_enum(out: &mut String, view: &EnumView) -> std::fmt::Result {
    writeln!(out, "/// Values of the `{}` attribute.", view.attribute)?;
    writeln!(
        out,
        "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]"
    )?;
    writeln!(out, "pub enum {} {{", view.ident)?;
    for v in &view.variants {
        writeln!(out, "    #[serde(rename = {:?})]", v.value)?;
        writeln!(out, "    {},", v.ident)?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "impl {} {{", view.ident)?;
    let all: Vec<String> = view.variants.iter().map(|v| format!("Self::{}", v.ident)).collect();
    writeln!(out, "    pub const ALL: &'static [Self] = &[{}];", all.join(", "))?;
    writeln!(out)?;
    writeln!(out, "    pub fn as_str(&self) -> &'static str {{")?;
    writeln!(out, "        match self {{")?;
    for v in &view.variants {
        writeln!(out, "            Self::{} => {:?},", v.ident, v.value)?;
    }
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)
}

fn write_type(out: &mut String, kind: &str, view: &TypeView) -> std::fmt::Result {
    let mut doc = vec![if view.is_abstract {
        format!("Abstract {kind} `{}`.", view.type_name)
    } else {
        format!("The `{}` {kind}.", view.type_name)
    }];
    if let Some(parent) = &view.parent {
        doc.push(String::new());
        doc.push(format!("Inherits from `{parent}`."));
    }
    let fields: Vec<_> = view.fields.iter().chain(&view.roles).cloned().collect();
    write_struct(out, &doc, DATA_DERIVES, &view.ident, &fields)?;
    writeln!(out)?;

    writeln!(out, "impl {} {{", view.ident)?;
    writeln!(out, "    pub const TYPE_NAME: &'static str = {:?};", view.type_name)?;
    writeln!(out, "    pub const KEYS: &'static [&'static str] = {};", str_slice(&view.keys))?;
    writeln!(out, "}}")?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::ModelBuilder;
    use crate::config::ModelConfig;
    use crate::render::HEADER;
    use tqlgen_schema::parse_schema;

    const SCHEMA: &str = r#"define
attribute name, value string;
attribute age, value integer;
attribute score, value double;
attribute status, value string @values("active", "on-hold");
attribute type, value string;
entity party @abstract, owns name @key;
entity person sub party, owns age @card(0..1), owns status, owns type,
    plays employment:employee;
entity company sub party, plays employment:employer;
relation employment, relates employee, relates employer, owns score;
struct address: street value string, zip value string?;
"#;

    fn view(config: &ModelConfig) -> ModelView {
        let mut schema = parse_schema(SCHEMA).unwrap();
        schema.accumulate_inheritance().unwrap();
        ModelBuilder::new(config).build(&schema)
    }

    #[test]
    fn test_render_parses_as_rust() {
        let config = ModelConfig {
            schema_version: Some("2.1".to_string()),
            ..ModelConfig::default()
        };
        let code = ModelTemplate::new().render(&view(&config)).unwrap();
        syn::parse_file(&code).unwrap();

        assert!(code.starts_with(HEADER));
        assert!(code.contains("pub const SCHEMA_VERSION: &str = \"2.1\";"));
        assert!(code.contains("pub enum Status {"));
        assert!(code.contains("    #[serde(rename = \"on-hold\")]\n    OnHold,"));
        assert!(code.contains("Self::OnHold => \"on-hold\","));
        assert!(code.contains("pub struct Address {"));
        assert!(code.contains("pub zip: Option<String>,"));
        assert!(code.contains("/// Inherits from `party`.\n"));
        assert!(code.contains("pub r#type: Option<String>,"));
        assert!(code.contains("pub employee: Option<Box<Person>>,"));
        assert!(code.contains("pub const TYPE_NAME: &'static str = \"employment\";"));
        assert!(!code.contains("pub struct Party"));
        assert!(code.ends_with("}\n"));
    }

    #[test]
    fn test_render_ownership_metadata() {
        let code = ModelTemplate::new().render(&view(&ModelConfig::default())).unwrap();
        syn::parse_file(&code).unwrap();

        assert!(code.contains(
            "/// The `person` entity.\n///\n/// Inherits from `party`.\n"
        ));
        assert!(code.contains("    /// @card(0..1)\n    #[serde(skip_serializing_if = \"Option::is_none\")]\n    pub age: Option<i64>,"));
        assert!(code.contains("    /// @key\n    pub name: String,"));
        assert!(code.contains("    pub const KEYS: &'static [&'static str] = &[\"name\"];"));
        assert!(code.contains("    pub const KEYS: &'static [&'static str] = &[];"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let view = view(&ModelConfig::default());
        let template = ModelTemplate::new();
        assert_eq!(template.render(&view).unwrap(), template.render(&view).unwrap());
    }

    #[test]
    fn test_abstract_types_and_no_header() {
        let config = ModelConfig {
            skip_abstract: false,
            enums: false,
            ..ModelConfig::default()
        };
        let code = ModelTemplate::new()
            .with_header(false)
            .render(&view(&config))
            .unwrap();
        syn::parse_file(&code).unwrap();
        assert!(!code.contains(HEADER));
        assert!(code.contains("/// Abstract entity `party`."));
        assert!(!code.contains("pub enum"));
        assert!(!code.contains("SCHEMA_VERSION"));
    }

    #[test]
    fn test_empty_schema() {
        let schema = parse_schema("define").unwrap();
        let view = ModelBuilder::new(&ModelConfig::default()).build(&schema);
        let code = ModelTemplate::new().render(&view).unwrap();
        assert_eq!(code, format!("{HEADER}\n\n//! Generated `models` module.\n"));
        syn::parse_file(&code).unwrap();
    }
}
