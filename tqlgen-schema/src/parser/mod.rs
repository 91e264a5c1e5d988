//! Schema parser for TypeQL `define` blocks.

mod grammar;

use std::path::Path;

use pest::Parser;
use pest::error::{InputLocation, LineColLocation};
use pest::iterators::{Pair, Pairs};
use tracing::debug;

use crate::ast::*;
use crate::error::{Location, SchemaError, SchemaResult};
use crate::lexer::{self, Token};
use crate::model::Schema;

pub use grammar::{Rule, TypeQlParser};

/// Parse schema text into the domain model.
///
/// Runs the tokenizer, the grammar and the converter. Inheritance is not
/// accumulated; call [`Schema::accumulate_inheritance`] for that.
pub fn parse_schema(input: &str) -> SchemaResult<Schema> {
    let file = parse_definitions(input)?;
    Schema::from_ast(&file)
}

/// Parse a schema from a file.
pub fn parse_schema_file(path: impl AsRef<Path>) -> SchemaResult<Schema> {
    let content = read_schema_source(path)?;
    parse_schema(&content)
}

/// Read a schema file into memory.
pub fn read_schema_source(path: impl AsRef<Path>) -> SchemaResult<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| SchemaError::IoError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Parse schema text into its parse tree.
pub fn parse_definitions(input: &str) -> SchemaResult<SchemaFile> {
    // Lexical errors take precedence over grammar errors.
    lexer::tokenize(input)?;

    let pairs = TypeQlParser::parse(Rule::schema, input).map_err(|e| {
        let at = error_location(&e);
        let message = e.renamed_rules(grammar::describe).variant.message().into_owned();
        SchemaError::syntax(input, at, message)
    })?;

    let mut file = SchemaFile::default();
    for pair in pairs.flat_map(|p| p.into_inner()) {
        let definition = match pair.as_rule() {
            Rule::attribute_def => Definition::Attribute(parse_attribute(pair, input)?),
            Rule::entity_def => Definition::Entity(parse_entity(pair, input)?),
            Rule::relation_def => Definition::Relation(parse_relation(pair, input)?),
            Rule::struct_def => Definition::Struct(parse_struct(pair, input)?),
            Rule::fun_def => Definition::Function(parse_function(pair, input)?),
            _ => continue,
        };
        file.definitions.push(definition);
    }

    debug!(definitions = file.definitions.len(), "parsed schema definitions");
    Ok(file)
}

/// Location of a pest error.
pub(crate) fn error_location(err: &pest::error::Error<Rule>) -> Location {
    let (offset, len) = match err.location {
        InputLocation::Pos(pos) => (pos, 0),
        InputLocation::Span((start, end)) => (start, end - start),
    };
    let (line, column) = match err.line_col {
        LineColLocation::Pos(pos) => pos,
        LineColLocation::Span(start, _) => start,
    };
    Location {
        offset,
        len,
        line,
        column,
    }
}

fn span_location(span: pest::Span<'_>) -> Location {
    let (line, column) = span.start_pos().line_col();
    Location {
        offset: span.start(),
        len: span.end() - span.start(),
        line,
        column,
    }
}

/// Keyword pairs carry no information once the grammar has matched.
fn is_marker(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::kw_define
            | Rule::kw_attribute
            | Rule::kw_entity
            | Rule::kw_relation
            | Rule::kw_struct
            | Rule::kw_sub
            | Rule::kw_value
            | Rule::kw_owns
            | Rule::kw_plays
            | Rule::kw_relates
            | Rule::kw_as
            | Rule::kw_card
            | Rule::kw_regex
            | Rule::kw_values
            | Rule::kw_range
            | Rule::fun_kw
            | Rule::EOI
    )
}

/// Child pairs of a rule with keyword markers skipped.
struct Children<'i> {
    inner: Pairs<'i, Rule>,
    span: pest::Span<'i>,
    input: &'i str,
}

impl<'i> Children<'i> {
    fn new(pair: Pair<'i, Rule>, input: &'i str) -> Self {
        Self {
            span: pair.as_span(),
            inner: pair.into_inner(),
            input,
        }
    }

    fn ident(&mut self, what: &str) -> SchemaResult<Ident> {
        match self.next() {
            Some(pair) if pair.as_rule() == Rule::ident => Ok(ident(&pair)),
            _ => Err(self.missing(what)),
        }
    }

    fn expect(&mut self, rule: Rule, what: &str) -> SchemaResult<Pair<'i, Rule>> {
        match self.next() {
            Some(pair) if pair.as_rule() == rule => Ok(pair),
            _ => Err(self.missing(what)),
        }
    }

    fn missing(&self, what: &str) -> SchemaError {
        SchemaError::syntax(self.input, span_location(self.span), format!("expected {what}"))
    }
}

impl<'i> Iterator for Children<'i> {
    type Item = Pair<'i, Rule>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find(|p| !is_marker(p.as_rule()))
    }
}

fn ident(pair: &Pair<'_, Rule>) -> Ident {
    Ident::new(pair.as_str(), pair.as_span().into())
}

fn unexpected(pair: &Pair<'_, Rule>, input: &str) -> SchemaError {
    SchemaError::syntax(
        input,
        span_location(pair.as_span()),
        format!("unexpected {}", grammar::describe(&pair.as_rule())),
    )
}

/// Parse an attribute definition.
fn parse_attribute(pair: Pair<'_, Rule>, input: &str) -> SchemaResult<AttributeDef> {
    let span = pair.as_span().into();
    let mut children = Children::new(pair, input);

    let name = children.ident("attribute name")?;
    let value_type = children.ident("value type")?;
    let annotations = children
        .map(|p| parse_annotation(p, input))
        .collect::<SchemaResult<Vec<_>>>()?;

    Ok(AttributeDef {
        name,
        value_type,
        annotations,
        span,
    })
}

/// Parse an entity definition.
fn parse_entity(pair: Pair<'_, Rule>, input: &str) -> SchemaResult<EntityDef> {
    let span = pair.as_span().into();
    let mut children = Children::new(pair, input);

    let mut entity = EntityDef {
        name: children.ident("entity name")?,
        parent: None,
        is_abstract: false,
        clauses: Vec::new(),
        span,
    };

    for item in children {
        match item.as_rule() {
            Rule::sub_clause => entity.parent = Some(parse_sub(item, input)?),
            Rule::abstract_annot => entity.is_abstract = true,
            Rule::owns_clause => entity.clauses.push(EntityClause::Owns(parse_owns(item, input)?)),
            Rule::plays_clause => {
                entity.clauses.push(EntityClause::Plays(parse_plays(item, input)?))
            }
            _ => return Err(unexpected(&item, input)),
        }
    }

    Ok(entity)
}

/// Parse a relation definition.
fn parse_relation(pair: Pair<'_, Rule>, input: &str) -> SchemaResult<RelationDef> {
    let span = pair.as_span().into();
    let mut children = Children::new(pair, input);

    let mut relation = RelationDef {
        name: children.ident("relation name")?,
        parent: None,
        is_abstract: false,
        clauses: Vec::new(),
        span,
    };

    for item in children {
        let clause = match item.as_rule() {
            Rule::sub_clause => {
                relation.parent = Some(parse_sub(item, input)?);
                continue;
            }
            Rule::abstract_annot => {
                relation.is_abstract = true;
                continue;
            }
            Rule::relates_clause => RelationClause::Relates(parse_relates(item, input)?),
            Rule::owns_clause => RelationClause::Owns(parse_owns(item, input)?),
            Rule::plays_clause => RelationClause::Plays(parse_plays(item, input)?),
            _ => return Err(unexpected(&item, input)),
        };
        relation.clauses.push(clause);
    }

    Ok(relation)
}

fn parse_sub(pair: Pair<'_, Rule>, input: &str) -> SchemaResult<Ident> {
    Children::new(pair, input).ident("parent type")
}

/// Parse an `owns` clause.
fn parse_owns(pair: Pair<'_, Rule>, input: &str) -> SchemaResult<OwnsClause> {
    let span = pair.as_span().into();
    let mut children = Children::new(pair, input);

    let attribute = children.ident("attribute name")?;
    let annotations = children
        .map(|p| parse_annotation(p, input))
        .collect::<SchemaResult<Vec<_>>>()?;

    Ok(OwnsClause {
        attribute,
        annotations,
        span,
    })
}

/// Parse a `plays relation:role` clause.
fn parse_plays(pair: Pair<'_, Rule>, input: &str) -> SchemaResult<PlaysClause> {
    let span = pair.as_span().into();
    let mut children = Children::new(pair, input);

    let relation = children.ident("relation name")?;
    let role = children.ident("role name")?;
    let annotations = children
        .map(|p| parse_annotation(p, input))
        .collect::<SchemaResult<Vec<_>>>()?;

    Ok(PlaysClause {
        relation,
        role,
        annotations,
        span,
    })
}

/// Parse a `relates role as parent-role` clause.
fn parse_relates(pair: Pair<'_, Rule>, input: &str) -> SchemaResult<RelatesClause> {
    let span = pair.as_span().into();
    let mut children = Children::new(pair, input);

    let role = children.ident("role name")?;
    let mut overrides = None;
    let mut annotations = Vec::new();
    for item in children {
        match item.as_rule() {
            Rule::as_clause => overrides = Some(Children::new(item, input).ident("parent role")?),
            _ => annotations.push(parse_annotation(item, input)?),
        }
    }

    Ok(RelatesClause {
        role,
        overrides,
        annotations,
        span,
    })
}

/// Parse an inline annotation.
fn parse_annotation(pair: Pair<'_, Rule>, input: &str) -> SchemaResult<Annotation> {
    let span = pair.as_span().into();
    let rule = pair.as_rule();
    let kind = match rule {
        Rule::key_annot => AnnotationKind::Key,
        Rule::unique_annot => AnnotationKind::Unique,
        Rule::card_annot => {
            let expr = Children::new(pair, input).expect(Rule::card_expr, "cardinality")?;
            AnnotationKind::Card(expr.as_str().into())
        }
        Rule::regex_annot => {
            let pattern = Children::new(pair, input).expect(Rule::string_lit, "pattern")?;
            AnnotationKind::Regex(pattern.as_str().into())
        }
        Rule::values_annot => AnnotationKind::Values(
            Children::new(pair, input)
                .map(|p| p.as_str().into())
                .collect(),
        ),
        Rule::range_annot => {
            let expr = Children::new(pair, input).expect(Rule::range_expr, "range")?;
            AnnotationKind::Range(expr.as_str().into())
        }
        _ => return Err(unexpected(&pair, input)),
    };

    Ok(Annotation { kind, span })
}

/// Parse a struct definition in either field layout.
fn parse_struct(pair: Pair<'_, Rule>, input: &str) -> SchemaResult<StructDef> {
    let span = pair.as_span().into();
    let mut children = Children::new(pair, input);

    let name = children.ident("struct name")?;
    let body = children
        .next()
        .ok_or_else(|| children.missing("struct fields"))?;
    let layout = match body.as_rule() {
        Rule::named_fields => FieldLayout::Named,
        Rule::legacy_fields => FieldLayout::Legacy,
        _ => return Err(unexpected(&body, input)),
    };

    let fields = Children::new(body, input)
        .map(|field| {
            let span = field.as_span().into();
            let mut parts = Children::new(field, input);
            let name = parts.ident("field name")?;
            let value_type = parts.ident("value type")?;
            let optional = parts.any(|p| p.as_rule() == Rule::optional_marker);
            Ok(StructFieldDef {
                name,
                value_type,
                optional,
                span,
            })
        })
        .collect::<SchemaResult<Vec<_>>>()?;

    Ok(StructDef {
        name,
        layout,
        fields,
        span,
    })
}

/// Parse a function definition, keeping its body as raw tokens.
fn parse_function(pair: Pair<'_, Rule>, input: &str) -> SchemaResult<FunctionDef> {
    let span = pair.as_span().into();
    let mut children = Children::new(pair, input);

    let name = children.ident("function name")?;
    let body: Vec<Token> = children.filter_map(|p| Token::from_pair(&p)).collect();

    Ok(FunctionDef { name, body, span })
}
