//! Tokenizer for schema source text.
//!
//! Comments and whitespace never reach the token stream. Keywords only match
//! as whole words, so `count_things` and `min-age` stay identifiers.

use pest::Parser;
use pest::iterators::Pair;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::debug;

use crate::ast::Span;
use crate::error::{SchemaError, SchemaResult};
use crate::parser::{Rule, TypeQlParser, error_location};

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Reserved word such as `entity` or `match`.
    Keyword,
    /// The `fun` keyword.
    FunKeyword,
    /// `@key`, `@card` and the other annotation markers.
    Annotation,
    /// Double-quoted string literal, quotes included.
    String,
    /// `$name` reference variable.
    Variable,
    /// `->`
    Arrow,
    /// Digit range such as `1`, `0..` or `1..5`.
    Cardinality,
    Ident,
    Operator,
    Punct,
}

impl TokenKind {
    pub(crate) fn from_rule(rule: Rule) -> Option<Self> {
        Some(match rule {
            Rule::keyword => Self::Keyword,
            Rule::fun_kw => Self::FunKeyword,
            Rule::annot_kw => Self::Annotation,
            Rule::string_lit => Self::String,
            Rule::variable => Self::Variable,
            Rule::arrow => Self::Arrow,
            Rule::card_expr => Self::Cardinality,
            Rule::ident => Self::Ident,
            Rule::operator => Self::Operator,
            Rule::punct => Self::Punct,
            _ => return None,
        })
    }
}

/// A single lexical token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: SmolStr,
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, text: impl Into<SmolStr>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Whether this is the punctuation token `p`.
    pub fn is_punct(&self, p: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == p
    }

    pub(crate) fn from_pair(pair: &Pair<'_, Rule>) -> Option<Self> {
        let kind = TokenKind::from_rule(pair.as_rule())?;
        Some(Self::new(kind, pair.as_str(), pair.as_span().into()))
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Split schema source into tokens.
///
/// Fails on the first character no token rule accepts; no partial stream is
/// returned.
pub fn tokenize(input: &str) -> SchemaResult<Vec<Token>> {
    let pairs = TypeQlParser::parse(Rule::tokens, input).map_err(|e| {
        let at = error_location(&e);
        let message = match input[at.offset..].chars().next() {
            Some(c) => format!("unrecognized character `{c}`"),
            None => "unexpected end of input".to_string(),
        };
        SchemaError::lexical(input, at, message)
    })?;

    let tokens: Vec<Token> = pairs
        .flat_map(|p| p.into_inner())
        .filter_map(|p| Token::from_pair(&p))
        .collect();

    debug!(tokens = tokens.len(), "tokenized schema source");
    Ok(tokens)
}
