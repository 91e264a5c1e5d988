//! Pest grammar binding for the TypeQL schema subset.

use pest_derive::Parser;

/// The TypeQL schema parser.
#[derive(Parser)]
#[grammar = "parser/typeql.pest"]
pub struct TypeQlParser;

/// Readable name of a rule for error messages.
pub(crate) fn describe(rule: &Rule) -> String {
    let name = match rule {
        Rule::EOI => "end of input",
        Rule::ident => "identifier",
        Rule::keyword => "keyword",
        Rule::fun_kw => "`fun`",
        Rule::annot_kw => "annotation",
        Rule::string_lit => "string literal",
        Rule::variable => "variable",
        Rule::arrow => "`->`",
        Rule::card_expr => "cardinality",
        Rule::range_expr => "range",
        Rule::operator => "operator",
        Rule::punct => "punctuation",
        Rule::kw_define => "`define`",
        Rule::kw_attribute => "`attribute`",
        Rule::kw_entity => "`entity`",
        Rule::kw_relation => "`relation`",
        Rule::kw_struct => "`struct`",
        Rule::kw_sub => "`sub`",
        Rule::kw_value => "`value`",
        Rule::kw_owns => "`owns`",
        Rule::kw_plays => "`plays`",
        Rule::kw_relates => "`relates`",
        Rule::kw_as => "`as`",
        Rule::kw_card => "`@card`",
        Rule::kw_regex => "`@regex`",
        Rule::kw_values => "`@values`",
        Rule::kw_range => "`@range`",
        Rule::attribute_def => "attribute definition",
        Rule::entity_def => "entity definition",
        Rule::relation_def => "relation definition",
        Rule::struct_def => "struct definition",
        Rule::fun_def => "function definition",
        Rule::sub_clause => "`sub` clause",
        Rule::abstract_annot => "`@abstract`",
        Rule::owns_clause => "`owns` clause",
        Rule::plays_clause => "`plays` clause",
        Rule::relates_clause => "`relates` clause",
        Rule::as_clause => "`as` clause",
        Rule::named_fields | Rule::named_field => "struct field",
        Rule::legacy_fields | Rule::legacy_field => "struct field",
        Rule::optional_marker => "`?`",
        Rule::key_annot => "`@key`",
        Rule::unique_annot => "`@unique`",
        Rule::card_annot => "`@card(...)`",
        Rule::regex_annot => "`@regex(...)`",
        Rule::values_annot => "`@values(...)`",
        Rule::range_annot => "`@range(...)`",
        other => return format!("{other:?}"),
    };
    name.to_string()
}
