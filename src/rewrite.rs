//! Rewrite template parser.
//!
//! A rewrite template is a sequence of literal runs and `{name}` references,
//! e.g. `/v2/{country}/{lang}`. Unlike match templates there are no glob
//! operators, and a name may be referenced more than once.

use crate::error::RewriteParseError;
use crate::parser::{is_valid_rewrite_literal, is_valid_variable_name};
use winnow::combinator::{opt, preceded};
use winnow::prelude::*;
use winnow::token::take_till;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteSegment {
    Literal(String),
    Variable(String),
}

impl RewriteSegment {
    pub fn variable_name(&self) -> Option<&str> {
        match self {
            RewriteSegment::Variable(name) => Some(name),
            RewriteSegment::Literal(_) => None,
        }
    }
}

fn literal_run<'a>(input: &mut &'a str) -> PResult<&'a str> {
    take_till(0.., '{').parse_next(input)
}

/// The text after an opening brace, up to but excluding the closing one.
fn variable_open<'a>(input: &mut &'a str) -> PResult<Option<&'a str>> {
    opt(preceded('{', take_till(0.., '}'))).parse_next(input)
}

fn variable_close(input: &mut &str) -> PResult<char> {
    '}'.parse_next(input)
}

pub fn parse_rewrite_pattern(template: &str) -> Result<Vec<RewriteSegment>, RewriteParseError> {
    if template.contains("//") {
        return Err(RewriteParseError::InvalidLiteral);
    }
    if !template.starts_with('/') {
        return Err(RewriteParseError::InvalidVariablePlacement);
    }

    let mut segments = Vec::new();
    let mut input = template;

    while !input.is_empty() {
        let text = literal_run
            .parse_next(&mut input)
            .map_err(|_| RewriteParseError::InvalidLiteral)?;
        if !text.is_empty() {
            if !is_valid_rewrite_literal(text) {
                return Err(RewriteParseError::InvalidLiteral);
            }
            segments.push(RewriteSegment::Literal(text.to_string()));
        }

        let name = match variable_open.parse_next(&mut input) {
            Ok(Some(name)) => name,
            Ok(None) => break,
            Err(_) => return Err(RewriteParseError::UnmatchedBracket),
        };
        if variable_close.parse_next(&mut input).is_err() {
            return Err(RewriteParseError::UnmatchedBracket);
        }
        if !is_valid_variable_name(name) {
            return Err(RewriteParseError::InvalidVariableName(name.to_string()));
        }
        segments.push(RewriteSegment::Variable(name.to_string()));
    }

    Ok(segments)
}

pub fn is_valid_rewrite_pattern(template: &str) -> Result<(), RewriteParseError> {
    parse_rewrite_pattern(template).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(text: &str) -> RewriteSegment {
        RewriteSegment::Literal(text.to_string())
    }

    fn var(name: &str) -> RewriteSegment {
        RewriteSegment::Variable(name.to_string())
    }

    #[test]
    fn test_literals_and_variables() {
        assert_eq!(
            parse_rewrite_pattern("/bar/{lang}/{country}").unwrap(),
            vec![lit("/bar/"), var("lang"), lit("/"), var("country")]
        );
    }

    #[test]
    fn test_literal_only() {
        assert_eq!(
            parse_rewrite_pattern("/static/index.html").unwrap(),
            vec![lit("/static/index.html")]
        );
    }

    #[test]
    fn test_adjacent_and_repeated_variables() {
        assert_eq!(
            parse_rewrite_pattern("/{a}{b}/{a}.txt").unwrap(),
            vec![
                lit("/"),
                var("a"),
                var("b"),
                lit("/"),
                var("a"),
                lit(".txt")
            ]
        );
    }

    #[test]
    fn test_doubled_separator() {
        assert_eq!(
            parse_rewrite_pattern("/foo//{a}"),
            Err(RewriteParseError::InvalidLiteral)
        );
        assert_eq!(
            parse_rewrite_pattern("/{a}//"),
            Err(RewriteParseError::InvalidLiteral)
        );
    }

    #[test]
    fn test_must_start_with_separator() {
        assert_eq!(
            parse_rewrite_pattern("{a}/b"),
            Err(RewriteParseError::InvalidVariablePlacement)
        );
        assert_eq!(
            parse_rewrite_pattern(""),
            Err(RewriteParseError::InvalidVariablePlacement)
        );
    }

    #[test]
    fn test_unmatched_bracket() {
        assert_eq!(
            parse_rewrite_pattern("/foo/{lang"),
            Err(RewriteParseError::UnmatchedBracket)
        );
    }

    #[test]
    fn test_invalid_literal() {
        assert_eq!(
            parse_rewrite_pattern("/foo/*"),
            Err(RewriteParseError::InvalidLiteral)
        );
        assert_eq!(
            parse_rewrite_pattern("/foo}/{a}"),
            Err(RewriteParseError::InvalidLiteral)
        );
    }

    #[test]
    fn test_invalid_variable_name() {
        assert_eq!(
            parse_rewrite_pattern("/{9lives}"),
            Err(RewriteParseError::InvalidVariableName("9lives".to_string()))
        );
        assert_eq!(
            parse_rewrite_pattern("/{a=*}"),
            Err(RewriteParseError::InvalidVariableName("a=*".to_string()))
        );
    }

    #[test]
    fn test_variable_name_helper() {
        let segments = parse_rewrite_pattern("/x/{id}").unwrap();
        let names: Vec<_> = segments.iter().filter_map(|s| s.variable_name()).collect();
        assert_eq!(names, vec!["id"]);
    }
}
