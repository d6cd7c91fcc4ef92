//! Match template parser.
//!
//! Turns a template such as `/v1/{bucket}/{object=**}.json` into a
//! [`ParsedUrlPattern`]: an ordered list of literals, glob operators and
//! variables, plus an optional literal suffix glued to the final segment.
//!
//! Tokens are lexed with winnow; the segment grammar itself is small enough
//! that the driving loop is written out by hand so that every failure maps to
//! its own [`TemplateError`].

use crate::error::TemplateError;
use std::collections::HashSet;
use std::fmt;
use winnow::combinator::{alt, delimited};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

pub const MAX_VARIABLES_PER_PATH: usize = 5;
pub const MAX_VARIABLE_NAME_LEN: usize = 16;

/// Characters allowed in a literal besides ASCII letters and digits.
const LITERAL_PUNCTUATION: &str = "-._~%!$&'()+,;:@";

// ============ Data Types ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `*`: exactly one non-empty path segment.
    PathGlob,
    /// `**`: the rest of the path, separators included.
    TextGlob,
}

pub type Literal<'a> = &'a str;

/// One item of a variable's match list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableMatch<'a> {
    Operator(Operator),
    Literal(Literal<'a>),
}

/// A named capture. An empty `matches` list means a bare `{name}`, which
/// captures a single segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable<'a> {
    pub name: &'a str,
    pub matches: Vec<VariableMatch<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedSegment<'a> {
    Operator(Operator),
    Variable(Variable<'a>),
    Literal(Literal<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrlPattern<'a> {
    pub segments: Vec<ParsedSegment<'a>>,
    /// Text that follows the final segment without a separator, e.g. the
    /// `.html` in `/{file}.html`.
    pub suffix: Option<Literal<'a>>,
    pub captured_variables: HashSet<&'a str>,
}

// ============ Character classes ============

fn is_pchar(c: char) -> bool {
    c.is_ascii_alphanumeric() || LITERAL_PUNCTUATION.contains(c)
}

/// Returns true if `literal` may appear in a match template.
pub fn is_valid_literal(literal: &str) -> bool {
    !literal.is_empty() && literal.chars().all(is_pchar)
}

/// Rewrite literals may additionally span several segments.
pub fn is_valid_rewrite_literal(literal: &str) -> bool {
    !literal.is_empty() && literal.chars().all(|c| is_pchar(c) || c == '/')
}

pub fn is_valid_variable_name(name: &str) -> bool {
    if name.len() > MAX_VARIABLE_NAME_LEN {
        return false;
    }
    let mut input = name;
    ident.parse_next(&mut input).is_ok() && input.is_empty()
}

// ============ Winnow Parsers ============

fn ident<'a>(input: &mut &'a str) -> PResult<(&'a str, &'a str)> {
    (
        take_while(1, |c: char| c.is_ascii_alphabetic()),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .parse_next(input)
}

fn operator(input: &mut &str) -> PResult<Operator> {
    alt(("**".value(Operator::TextGlob), "*".value(Operator::PathGlob))).parse_next(input)
}

fn literal<'a>(input: &mut &'a str) -> PResult<&'a str> {
    take_till(0.., '/').parse_next(input)
}

fn braced<'a>(input: &mut &'a str) -> PResult<&'a str> {
    delimited('{', take_till(0.., '}'), '}').parse_next(input)
}

// ============ Segment Parsing ============

fn parse_operator(input: &mut &str) -> Result<Operator, TemplateError> {
    let start = *input;
    operator
        .parse_next(input)
        .map_err(|_| TemplateError::InvalidLiteral(start.to_string()))
}

fn parse_literal<'a>(input: &mut &'a str) -> Result<&'a str, TemplateError> {
    let start = *input;
    let text = literal
        .parse_next(input)
        .map_err(|_| TemplateError::InvalidLiteral(start.to_string()))?;
    if is_valid_literal(text) {
        Ok(text)
    } else {
        Err(TemplateError::InvalidLiteral(text.to_string()))
    }
}

fn parse_variable<'a>(input: &mut &'a str) -> Result<Variable<'a>, TemplateError> {
    let body = braced
        .parse_next(input)
        .map_err(|_| TemplateError::UnmatchedBracket)?;

    let (name, match_list) = match body.split_once('=') {
        Some((name, list)) => (name, Some(list)),
        None => (body, None),
    };
    if !is_valid_variable_name(name) {
        return Err(TemplateError::InvalidVariableName(name.to_string()));
    }

    let mut variable = Variable {
        name,
        matches: Vec::new(),
    };
    let Some(mut rest) = match_list else {
        return Ok(variable);
    };
    if rest.is_empty() {
        return Err(TemplateError::EmptyVariableMatch(name.to_string()));
    }

    loop {
        let item = if rest.starts_with('*') {
            VariableMatch::Operator(parse_operator(&mut rest)?)
        } else {
            VariableMatch::Literal(parse_literal(&mut rest)?)
        };
        variable.matches.push(item);

        if rest.is_empty() {
            break;
        }
        rest = match rest.strip_prefix('/') {
            Some(next) if !next.is_empty() => next,
            _ => return Err(TemplateError::InvalidVariableMatch(name.to_string())),
        };
    }

    Ok(variable)
}

fn parse_segment<'a>(input: &mut &'a str) -> Result<ParsedSegment<'a>, TemplateError> {
    match input.chars().next() {
        Some('/') => Err(TemplateError::EmptySegment),
        Some('*') => parse_operator(input).map(ParsedSegment::Operator),
        Some('{') => parse_variable(input).map(ParsedSegment::Variable),
        _ => parse_literal(input).map(ParsedSegment::Literal),
    }
}

fn gather_capture_names<'a>(
    segments: &[ParsedSegment<'a>],
) -> Result<HashSet<&'a str>, TemplateError> {
    let mut names = HashSet::new();
    for segment in segments {
        let ParsedSegment::Variable(var) = segment else {
            continue;
        };
        if names.len() >= MAX_VARIABLES_PER_PATH {
            return Err(TemplateError::TooManyVariables(MAX_VARIABLES_PER_PATH));
        }
        if !names.insert(var.name) {
            return Err(TemplateError::DuplicateVariable(var.name.to_string()));
        }
    }
    Ok(names)
}

/// Rejects anything that follows a `**`, whether a top-level segment or an
/// item inside a variable's match list.
pub fn validate_no_operator_after_text_glob(
    pattern: &ParsedUrlPattern<'_>,
) -> Result<(), TemplateError> {
    let mut seen_text_glob = false;
    for segment in &pattern.segments {
        if seen_text_glob {
            return Err(TemplateError::GlobNotTerminal);
        }
        match segment {
            ParsedSegment::Operator(op) => seen_text_glob = *op == Operator::TextGlob,
            ParsedSegment::Variable(var) => {
                for item in &var.matches {
                    if seen_text_glob {
                        return Err(TemplateError::GlobNotTerminal);
                    }
                    if let VariableMatch::Operator(op) = item {
                        seen_text_glob = *op == Operator::TextGlob;
                    }
                }
            }
            ParsedSegment::Literal(_) => {}
        }
    }
    Ok(())
}

// ============ Public API ============

pub fn parse_url_pattern(template: &str) -> Result<ParsedUrlPattern<'_>, TemplateError> {
    let mut input = template
        .strip_prefix('/')
        .ok_or(TemplateError::MissingLeadingSeparator)?;
    if let Some(c) = input.chars().find(|c| !c.is_ascii_graphic()) {
        return Err(TemplateError::InvalidCharacter(c));
    }

    let mut segments = Vec::new();
    let mut suffix = None;

    while !input.is_empty() {
        segments.push(parse_segment(&mut input)?);

        if input.is_empty() {
            break;
        }
        if input == "/" {
            // A lone trailing separator is kept as an empty final literal.
            segments.push(ParsedSegment::Literal(""));
            break;
        }
        if let Some(rest) = input.strip_prefix('/') {
            input = rest;
            continue;
        }

        // Text glued to the segment we just parsed must run to the end.
        if !is_valid_literal(input) {
            return Err(TemplateError::InvalidLiteral(input.to_string()));
        }
        suffix = Some(input);
        break;
    }

    let captured_variables = gather_capture_names(&segments)?;
    let pattern = ParsedUrlPattern {
        segments,
        suffix,
        captured_variables,
    };
    validate_no_operator_after_text_glob(&pattern)?;
    Ok(pattern)
}

// ============ Rendering ============

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::PathGlob => f.write_str("*"),
            Operator::TextGlob => f.write_str("**"),
        }
    }
}

impl fmt::Display for VariableMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableMatch::Operator(op) => write!(f, "{}", op),
            VariableMatch::Literal(text) => f.write_str(text),
        }
    }
}

impl fmt::Display for Variable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}", self.name)?;
        for (i, item) in self.matches.iter().enumerate() {
            f.write_str(if i == 0 { "=" } else { "/" })?;
            write!(f, "{}", item)?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for ParsedSegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedSegment::Operator(op) => write!(f, "{}", op),
            ParsedSegment::Variable(var) => write!(f, "{}", var),
            ParsedSegment::Literal(text) => f.write_str(text),
        }
    }
}

impl fmt::Display for ParsedUrlPattern<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", segment)?;
        }
        if let Some(suffix) = self.suffix {
            f.write_str(suffix)?;
        }
        Ok(())
    }
}
