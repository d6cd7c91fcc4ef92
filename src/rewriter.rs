//! Path rewriting driven by the captures of a match template.

use crate::binder::{bind, is_valid_shared_variable_set, substitute, ResolvedSegment};
use crate::error::{CompatibilityError, ConfigError, RewriteError};
use crate::matcher::{PathMatcher, MATCHER_NAME};
use crate::regex_gen::{compile_anchored, convert_path_template_to_regex};
use crate::rewrite::{parse_rewrite_pattern, RewriteSegment};
use regex::Regex;
use std::fmt::Debug;

pub const REWRITER_NAME: &str = "path.rewrite.pattern_template.pattern_template_rewriter";

/// Produces a new path for a request that a paired matcher accepted.
pub trait PathRewriter: Send + Sync + Debug {
    /// Rewrites `path`, which must match `match_template` in full.
    fn rewrite_path(&self, match_template: &str, path: &str) -> Result<String, RewriteError>;

    /// The rewrite template this rewriter was built from.
    fn pattern(&self) -> &str;

    /// Identifies the rewriter family.
    fn name(&self) -> &str;

    /// Checked once when a route is configured, never per request.
    fn is_compatible_match_policy(
        &self,
        matcher: &dyn PathMatcher,
        active: bool,
    ) -> Result<(), CompatibilityError>;
}

/// Rewrites paths using variables captured by a [`PatternTemplateMatcher`].
///
/// With a match template of `/foo/bar/{var}` and a rewrite template of
/// `/foo/{var}`, the path `/foo/bar/cat` becomes `/foo/cat`.
///
/// [`PatternTemplateMatcher`]: crate::PatternTemplateMatcher
#[derive(Debug, Clone)]
pub struct PatternTemplateRewriter {
    rewrite_pattern: String,
    segments: Vec<RewriteSegment>,
}

impl PatternTemplateRewriter {
    pub fn new(rewrite_pattern: impl Into<String>) -> Result<Self, ConfigError> {
        let rewrite_pattern = rewrite_pattern.into();
        let segments = parse_rewrite_pattern(&rewrite_pattern)?;
        Ok(Self {
            rewrite_pattern,
            segments,
        })
    }

    pub fn segments(&self) -> &[RewriteSegment] {
        &self.segments
    }

    /// Resolves this rewrite against `match_template` once, so that the
    /// result can be reused for every request on the route.
    pub fn bind(&self, match_template: &str) -> Result<BoundRewrite, RewriteError> {
        let source = convert_path_template_to_regex(match_template)
            .map_err(RewriteError::UnparsableMatchedPath)?;
        let regex = compile_anchored(&source)?;
        let segments =
            bind(&self.segments, &regex).map_err(RewriteError::UnparsableRewritePattern)?;
        Ok(BoundRewrite { regex, segments })
    }
}

impl PathRewriter for PatternTemplateRewriter {
    fn rewrite_path(&self, match_template: &str, path: &str) -> Result<String, RewriteError> {
        let result = self
            .bind(match_template)
            .and_then(|bound| bound.rewrite(path));
        if let Err(e) = &result {
            tracing::trace!(
                match_template,
                rewrite = %self.rewrite_pattern,
                path,
                error = %e,
                "path rewrite failed"
            );
        }
        result
    }

    fn pattern(&self) -> &str {
        &self.rewrite_pattern
    }

    fn name(&self) -> &str {
        REWRITER_NAME
    }

    fn is_compatible_match_policy(
        &self,
        matcher: &dyn PathMatcher,
        active: bool,
    ) -> Result<(), CompatibilityError> {
        if !active || matcher.name() != MATCHER_NAME {
            tracing::warn!(
                matcher = matcher.name(),
                active,
                "rewriter paired with an unusable matcher"
            );
            return Err(CompatibilityError::IncompatibleMatcher {
                rewriter: REWRITER_NAME,
                matcher: MATCHER_NAME,
            });
        }

        if let Err(e) = is_valid_shared_variable_set(&self.segments, matcher.pattern()) {
            tracing::warn!(
                match_pattern = matcher.pattern(),
                rewrite_pattern = %self.rewrite_pattern,
                error = %e,
                "variable mismatch between match and rewrite templates"
            );
            return Err(CompatibilityError::VariableMismatch {
                match_pattern: matcher.pattern().to_string(),
                rewrite_pattern: self.rewrite_pattern.clone(),
            });
        }

        tracing::debug!(
            match_pattern = matcher.pattern(),
            rewrite_pattern = %self.rewrite_pattern,
            "rewrite template is compatible with match template"
        );
        Ok(())
    }
}

/// A rewrite template resolved against one match template.
#[derive(Debug, Clone)]
pub struct BoundRewrite {
    regex: Regex,
    segments: Vec<ResolvedSegment>,
}

impl BoundRewrite {
    pub fn rewrite(&self, path: &str) -> Result<String, RewriteError> {
        substitute(path, &self.regex, &self.segments)
    }

    pub fn segments(&self) -> &[ResolvedSegment] {
        &self.segments
    }
}
