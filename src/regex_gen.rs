//! Lowering of parsed match templates into regex source.
//!
//! The generated source is never anchored; callers that need a full match go
//! through [`compile_anchored`], which wraps the source in a non-capturing
//! group so that capture indices stay the same.

use crate::error::TemplateError;
use crate::parser::{
    parse_url_pattern, Literal, Operator, ParsedSegment, ParsedUrlPattern, Variable,
    VariableMatch,
};
use regex::Regex;

const PATH_GLOB_REGEX: &str = r"[a-zA-Z0-9\-._~%!$&'()+,;:@]+";
const TEXT_GLOB_REGEX: &str = r"[a-zA-Z0-9\-._~%!$&'()+,;:@/]*";

/// Used when a variable is written as a bare `{name}`.
const DEFAULT_VARIABLE_OPERATOR: Operator = Operator::PathGlob;

fn literal_regex(literal: Literal<'_>) -> String {
    regex::escape(literal)
}

fn operator_regex(op: Operator) -> &'static str {
    match op {
        Operator::PathGlob => PATH_GLOB_REGEX,
        Operator::TextGlob => TEXT_GLOB_REGEX,
    }
}

fn variable_regex(var: &Variable<'_>) -> String {
    let inner = if var.matches.is_empty() {
        operator_regex(DEFAULT_VARIABLE_OPERATOR).to_string()
    } else {
        var.matches
            .iter()
            .map(|item| match item {
                VariableMatch::Operator(op) => operator_regex(*op).to_string(),
                VariableMatch::Literal(text) => literal_regex(text),
            })
            .collect::<Vec<_>>()
            .join("/")
    };
    format!("(?P<{}>{})", var.name, inner)
}

fn segment_regex(segment: &ParsedSegment<'_>) -> String {
    match segment {
        ParsedSegment::Operator(op) => operator_regex(*op).to_string(),
        ParsedSegment::Variable(var) => variable_regex(var),
        ParsedSegment::Literal(text) => literal_regex(text),
    }
}

/// Produces one named group per variable, in declaration order.
pub fn to_regex_pattern(pattern: &ParsedUrlPattern<'_>) -> String {
    let body = pattern
        .segments
        .iter()
        .map(segment_regex)
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}{}", body, literal_regex(pattern.suffix.unwrap_or("")))
}

pub fn convert_path_template_to_regex(template: &str) -> Result<String, TemplateError> {
    parse_url_pattern(template).map(|pattern| to_regex_pattern(&pattern))
}

pub fn is_valid_match_pattern(template: &str) -> Result<(), TemplateError> {
    convert_path_template_to_regex(template).map(|_| ())
}

/// Compiles `source` so that it only matches whole inputs.
pub fn compile_anchored(source: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", source))
}
