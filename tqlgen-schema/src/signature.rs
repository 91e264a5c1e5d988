//! Function signature recovery from raw body tokens.
//!
//! Function bodies are not parsed. The parameter list and return type are
//! read off the token stream by a small state machine instead.

use crate::lexer::{Token, TokenKind};
use crate::model::ParameterSpec;

/// Parameters and return type of a function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionSignature {
    pub parameters: Vec<ParameterSpec>,
    pub return_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Before the parameter group.
    Seeking,
    /// Inside the parameter group at the given paren depth.
    Params(usize),
    /// Between the parameter group and `->`.
    SeekingArrow,
    /// Collecting return type tokens.
    Return,
}

/// Recover the signature of a function from the tokens after its name.
///
/// The first top-level parenthesized group holds the parameters, split on
/// top-level commas. The return type is every token after the following
/// `->` up to the next `:` or `;`, joined with single spaces. When the
/// group never closes there are no parameters and the first `->` anywhere
/// starts the return type.
pub fn extract_signature(tokens: &[Token]) -> FunctionSignature {
    let mut phase = Phase::Seeking;
    let mut parameters = Vec::new();
    let mut pending: Vec<ParameterSpec> = Vec::new();
    let mut run: Vec<&Token> = Vec::new();
    let mut return_parts: Vec<&str> = Vec::new();

    for token in tokens {
        phase = match phase {
            Phase::Seeking if token.is_punct("(") => Phase::Params(1),
            Phase::Seeking | Phase::SeekingArrow if token.kind == TokenKind::Arrow => Phase::Return,
            Phase::Seeking | Phase::SeekingArrow => phase,
            Phase::Params(depth) if token.is_punct(")") => {
                if depth == 1 {
                    pending.extend(parse_parameter(&run));
                    run.clear();
                    parameters = std::mem::take(&mut pending);
                    Phase::SeekingArrow
                } else {
                    run.push(token);
                    Phase::Params(depth - 1)
                }
            }
            Phase::Params(depth) if token.is_punct("(") => {
                run.push(token);
                Phase::Params(depth + 1)
            }
            Phase::Params(1) if token.is_punct(",") => {
                pending.extend(parse_parameter(&run));
                run.clear();
                phase
            }
            Phase::Params(_) => {
                run.push(token);
                phase
            }
            Phase::Return if token.is_punct(":") || token.is_punct(";") => break,
            Phase::Return => {
                return_parts.push(&token.text);
                phase
            }
        };
    }

    if matches!(phase, Phase::Params(_)) {
        return FunctionSignature {
            parameters,
            return_type: return_after_arrow(tokens),
        };
    }

    FunctionSignature {
        parameters,
        return_type: (!return_parts.is_empty()).then(|| return_parts.join(" ")),
    }
}

/// Tokens after the first `->` up to the next `:` or `;`.
fn return_after_arrow(tokens: &[Token]) -> Option<String> {
    let start = tokens.iter().position(|t| t.kind == TokenKind::Arrow)? + 1;
    let parts: Vec<&str> = tokens[start..]
        .iter()
        .take_while(|t| !t.is_punct(":") && !t.is_punct(";"))
        .map(|t| t.text.as_str())
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Turn `$name : type` into a parameter. Empty runs yield nothing.
fn parse_parameter(run: &[&Token]) -> Option<ParameterSpec> {
    let name = run
        .iter()
        .find(|t| t.kind == TokenKind::Variable)
        .map(|t| t.text.trim_start_matches('$'))
        .unwrap_or_default();
    let type_name = run
        .iter()
        .filter(|t| t.kind != TokenKind::Variable && !t.is_punct(":"))
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() && type_name.is_empty() {
        return None;
    }
    Some(ParameterSpec {
        name: name.into(),
        type_name,
    })
}
