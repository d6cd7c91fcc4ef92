//! Path matching against a compiled match template.

use crate::error::ConfigError;
use crate::path_util::strip_query_and_fragment;
use crate::regex_gen::{compile_anchored, convert_path_template_to_regex};
use regex::Regex;
use std::fmt::Debug;

pub const MATCHER_NAME: &str = "path.match.pattern_template.pattern_template_matcher";

/// Decides whether a request path belongs to a route.
pub trait PathMatcher: Send + Sync + Debug {
    /// Returns true if `path`, minus any query and fragment, matches in full.
    fn matches(&self, path: &str) -> bool;

    /// The template this matcher was built from.
    fn pattern(&self) -> &str;

    /// Identifies the matcher family.
    fn name(&self) -> &str;
}

/// Matches paths against a template such as `/bar/{lang}/{country}`.
///
/// # Example
///
/// ```
/// use path_template::{PathMatcher, PatternTemplateMatcher};
///
/// let matcher = PatternTemplateMatcher::new("/bar/{lang}/{country}").unwrap();
/// assert!(matcher.matches("/bar/en/usa"));
/// assert!(matcher.matches("/bar/en/usa?page=2"));
/// assert!(!matcher.matches("/bar/en/usa/extra"));
/// ```
#[derive(Debug, Clone)]
pub struct PatternTemplateMatcher {
    path_template: String,
    regex_source: String,
    regex: Regex,
}

impl PatternTemplateMatcher {
    pub fn new(path_template: impl Into<String>) -> Result<Self, ConfigError> {
        let path_template = path_template.into();
        let regex_source = convert_path_template_to_regex(&path_template)?;
        let regex = compile_anchored(&regex_source)?;
        Ok(Self {
            path_template,
            regex_source,
            regex,
        })
    }

    /// The unanchored regex generated for the template.
    pub fn regex_source(&self) -> &str {
        &self.regex_source
    }

    /// Variable names in declaration order.
    pub fn capture_names(&self) -> Vec<&str> {
        self.regex.capture_names().flatten().collect()
    }
}

impl PathMatcher for PatternTemplateMatcher {
    fn matches(&self, path: &str) -> bool {
        self.regex.is_match(strip_query_and_fragment(path))
    }

    fn pattern(&self) -> &str {
        &self.path_template
    }

    fn name(&self) -> &str {
        MATCHER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TemplateError;

    #[test]
    fn test_full_match_only() {
        let matcher = PatternTemplateMatcher::new("/bar/{lang}/{country}").unwrap();
        assert!(matcher.matches("/bar/en/usa"));
        assert!(!matcher.matches("/bar/en/usa/extra"));
        assert!(!matcher.matches("/bar/en"));
        assert!(!matcher.matches("/foo/bar/en/usa"));
    }

    #[test]
    fn test_query_and_fragment_ignored() {
        let matcher = PatternTemplateMatcher::new("/bar/{lang}").unwrap();
        assert!(matcher.matches("/bar/en?x=1"));
        assert!(matcher.matches("/bar/en#section"));
        assert!(!matcher.matches("/bar/en/?x=1"));
    }

    #[test]
    fn test_glob_templates() {
        let matcher = PatternTemplateMatcher::new("/static/{path=**}").unwrap();
        assert!(matcher.matches("/static/css/site.css"));
        assert!(matcher.matches("/static/"));
        assert!(!matcher.matches("/assets/site.css"));

        let matcher = PatternTemplateMatcher::new("/users/*/profile").unwrap();
        assert!(matcher.matches("/users/42/profile"));
        assert!(!matcher.matches("/users/42/43/profile"));
    }

    #[test]
    fn test_pattern_is_source_text() {
        let template = "/v1/{bucket}/{object=**}.json";
        let matcher = PatternTemplateMatcher::new(template).unwrap();
        assert_eq!(matcher.pattern(), template);
        assert_eq!(matcher.name(), MATCHER_NAME);
        assert_eq!(matcher.capture_names(), vec!["bucket", "object"]);
    }

    #[test]
    fn test_invalid_template() {
        assert!(matches!(
            PatternTemplateMatcher::new("/foo/**/bar"),
            Err(ConfigError::Template(TemplateError::GlobNotTerminal))
        ));
    }
}
