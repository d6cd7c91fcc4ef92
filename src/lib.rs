//! Path template matching and rewriting for proxy routes.
//!
//! A match template such as `/bar/{lang}/{country}` is compiled into an
//! anchored regex with one named group per variable. A rewrite template such
//! as `/foo/{country}/{lang}` is then filled in from those groups.
//!
//! Match template syntax:
//!
//! * `literal` — one segment of fixed text
//! * `*` — exactly one segment
//! * `**` — the rest of the path; nothing may follow it except a suffix
//! * `{name}` — capture one segment as `name`
//! * `{name=items}` — capture the `/`-joined literals and globs in `items`
//!
//! # Example
//!
//! ```
//! use path_template::{PathMatcher, PathRewriter, PatternTemplateMatcher, PatternTemplateRewriter};
//!
//! let matcher = PatternTemplateMatcher::new("/bar/{lang}/{country}").unwrap();
//! let rewriter = PatternTemplateRewriter::new("/foo/{country}/{lang}").unwrap();
//!
//! // Checked once, when the route is configured.
//! rewriter.is_compatible_match_policy(&matcher, true).unwrap();
//!
//! assert!(matcher.matches("/bar/en/usa"));
//! assert_eq!(
//!     rewriter.rewrite_path(matcher.pattern(), "/bar/en/usa").unwrap(),
//!     "/foo/usa/en"
//! );
//! ```

mod binder;
mod config;
mod error;
mod matcher;
mod parser;
mod path_util;
mod regex_gen;
mod rewrite;
mod rewriter;

pub use binder::{bind, is_valid_shared_variable_set, substitute, ResolvedSegment};
pub use config::{
    ExtensionRegistry, PathMatcherFactory, PathRewriterFactory, PatternTemplateMatchConfig,
    PatternTemplateMatcherFactory, PatternTemplateRewriteConfig, PatternTemplateRewriterFactory,
    TypedExtensionConfig, MATCH_CATEGORY, REWRITE_CATEGORY,
};
pub use error::{
    BindError, CompatibilityError, ConfigError, Result, RewriteError, RewriteParseError,
    TemplateError,
};
pub use matcher::{PathMatcher, PatternTemplateMatcher, MATCHER_NAME};
pub use parser::{
    is_valid_literal, is_valid_rewrite_literal, is_valid_variable_name, parse_url_pattern,
    validate_no_operator_after_text_glob, Literal, Operator, ParsedSegment, ParsedUrlPattern,
    Variable, VariableMatch, MAX_VARIABLES_PER_PATH, MAX_VARIABLE_NAME_LEN,
};
pub use path_util::strip_query_and_fragment;
pub use regex_gen::{
    compile_anchored, convert_path_template_to_regex, is_valid_match_pattern, to_regex_pattern,
};
pub use rewrite::{is_valid_rewrite_pattern, parse_rewrite_pattern, RewriteSegment};
pub use rewriter::{BoundRewrite, PathRewriter, PatternTemplateRewriter, REWRITER_NAME};
