//! Binding of rewrite variables to capture groups, and capture substitution.

use crate::error::{BindError, RewriteError};
use crate::parser::parse_url_pattern;
use crate::rewrite::RewriteSegment;
use regex::Regex;
use std::collections::HashMap;

/// A rewrite segment whose variable has been resolved against a regex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSegment {
    Literal(String),
    /// Index into the capture array; 0 is the whole match and never valid.
    CaptureIndex(usize),
}

pub fn bind(segments: &[RewriteSegment], regex: &Regex) -> Result<Vec<ResolvedSegment>, BindError> {
    let capture_index: HashMap<&str, usize> = regex
        .capture_names()
        .enumerate()
        .filter_map(|(i, name)| name.map(|name| (name, i)))
        .collect();

    segments
        .iter()
        .map(|segment| match segment {
            RewriteSegment::Literal(text) => Ok(ResolvedSegment::Literal(text.clone())),
            RewriteSegment::Variable(name) => capture_index
                .get(name.as_str())
                .map(|&i| ResolvedSegment::CaptureIndex(i))
                .ok_or_else(|| BindError::NonexistentVariable(name.clone())),
        })
        .collect()
}

/// Checks that every variable the rewrite references is captured by
/// `match_template`. The match side may capture more than is used.
pub fn is_valid_shared_variable_set(
    segments: &[RewriteSegment],
    match_template: &str,
) -> Result<(), BindError> {
    let pattern = parse_url_pattern(match_template)?;
    match segments
        .iter()
        .filter_map(RewriteSegment::variable_name)
        .find(|name| !pattern.captured_variables.contains(name))
    {
        Some(missing) => Err(BindError::NonexistentVariable(missing.to_string())),
        None => Ok(()),
    }
}

/// Matches `path` against the anchored `regex` and splices its captures into
/// the resolved segments.
pub fn substitute(
    path: &str,
    regex: &Regex,
    segments: &[ResolvedSegment],
) -> Result<String, RewriteError> {
    let captures = regex.captures(path).ok_or(RewriteError::PatternNotMatch)?;
    let capture_num = regex.captures_len();

    let mut rewritten = String::with_capacity(path.len());
    for segment in segments {
        match segment {
            ResolvedSegment::Literal(text) => rewritten.push_str(text),
            ResolvedSegment::CaptureIndex(i) => {
                if *i < 1 || *i >= capture_num {
                    return Err(RewriteError::InvalidVariableIndex(*i));
                }
                rewritten.push_str(captures.get(*i).map_or("", |m| m.as_str()));
            }
        }
    }
    Ok(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex_gen::{compile_anchored, convert_path_template_to_regex};
    use crate::rewrite::parse_rewrite_pattern;

    fn regex_for(template: &str) -> Regex {
        compile_anchored(&convert_path_template_to_regex(template).unwrap()).unwrap()
    }

    #[test]
    fn test_bind_resolves_indices() {
        let regex = regex_for("/bar/{country}/{lang}");
        let segments = parse_rewrite_pattern("/bar/{lang}/{country}").unwrap();
        assert_eq!(
            bind(&segments, &regex).unwrap(),
            vec![
                ResolvedSegment::Literal("/bar/".to_string()),
                ResolvedSegment::CaptureIndex(2),
                ResolvedSegment::Literal("/".to_string()),
                ResolvedSegment::CaptureIndex(1),
            ]
        );
    }

    #[test]
    fn test_bind_unknown_variable() {
        let regex = regex_for("/bar/{lang}");
        let segments = parse_rewrite_pattern("/{country}").unwrap();
        assert!(matches!(
            bind(&segments, &regex),
            Err(BindError::NonexistentVariable(name)) if name == "country"
        ));
    }

    #[test]
    fn test_shared_variable_set() {
        let segments = parse_rewrite_pattern("/foo/{lang}").unwrap();
        assert!(is_valid_shared_variable_set(&segments, "/bar/{lang}/{country}").is_ok());

        let segments = parse_rewrite_pattern("/foo/{lang}/{missing}").unwrap();
        assert!(matches!(
            is_valid_shared_variable_set(&segments, "/bar/{lang}/{country}"),
            Err(BindError::NonexistentVariable(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_shared_variable_set_bad_match_template() {
        let segments = parse_rewrite_pattern("/foo").unwrap();
        assert!(matches!(
            is_valid_shared_variable_set(&segments, "bar"),
            Err(BindError::Template(_))
        ));
    }

    #[test]
    fn test_substitute() {
        let regex = regex_for("/bar/{country}/{lang}");
        let segments = bind(
            &parse_rewrite_pattern("/bar/{lang}/{country}").unwrap(),
            &regex,
        )
        .unwrap();
        assert_eq!(
            substitute("/bar/en/usa", &regex, &segments).unwrap(),
            "/bar/usa/en"
        );
    }

    #[test]
    fn test_substitute_no_match() {
        let regex = regex_for("/bar/{lang}");
        assert!(matches!(
            substitute("/foo/en", &regex, &[]),
            Err(RewriteError::PatternNotMatch)
        ));
    }

    #[test]
    fn test_substitute_invalid_index() {
        let regex = regex_for("/bar/{lang}");
        for index in [0, 2] {
            let segments = vec![ResolvedSegment::CaptureIndex(index)];
            assert!(matches!(
                substitute("/bar/en", &regex, &segments),
                Err(RewriteError::InvalidVariableIndex(i)) if i == index
            ));
        }
    }
}
