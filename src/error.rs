use thiserror::Error;

/// Syntax errors in a match template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("invalid template: must begin with separator")]
    MissingLeadingSeparator,
    #[error("invalid template: character {0:?} is not allowed")]
    InvalidCharacter(char),
    #[error("invalid template: empty segment")]
    EmptySegment,
    #[error("invalid variable name '{0}'")]
    InvalidVariableName(String),
    #[error("invalid literal '{0}'")]
    InvalidLiteral(String),
    #[error("unmatched variable bracket")]
    UnmatchedBracket,
    #[error("empty variable match for '{0}'")]
    EmptyVariableMatch(String),
    #[error("invalid variable match for '{0}'")]
    InvalidVariableMatch(String),
    #[error("duplicate variable '{0}'")]
    DuplicateVariable(String),
    #[error("exceeded variable count limit of {0}")]
    TooManyVariables(usize),
    #[error("glob must terminate pattern")]
    GlobNotTerminal,
}

/// Syntax errors in a rewrite template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteParseError {
    #[error("invalid rewrite literal pattern")]
    InvalidLiteral,
    #[error("invalid rewrite variable placement")]
    InvalidVariablePlacement,
    #[error("unmatched variable bracket")]
    UnmatchedBracket,
    #[error("invalid variable name '{0}'")]
    InvalidVariableName(String),
}

#[derive(Error, Debug)]
pub enum BindError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Rewrite(#[from] RewriteParseError),
    #[error("nonexistent variable name '{0}'")]
    NonexistentVariable(String),
}

/// Failures while producing a rewritten path.
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("unable to parse matched_path")]
    UnparsableMatchedPath(#[source] TemplateError),
    #[error("unable to parse path rewrite pattern")]
    UnparsableRewritePattern(#[source] BindError),
    #[error("failed to build capture regex: {0}")]
    Regex(#[from] regex::Error),
    #[error("pattern not match")]
    PatternNotMatch,
    #[error("invalid variable index {0}")]
    InvalidVariableIndex(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompatibilityError {
    #[error("unable to use {rewriter} extension without {matcher} extension")]
    IncompatibleMatcher {
        rewriter: &'static str,
        matcher: &'static str,
    },
    #[error(
        "mismatch between variables in path_match_policy {match_pattern} and path_rewrite_policy {rewrite_pattern}"
    )]
    VariableMismatch {
        match_pattern: String,
        rewrite_pattern: String,
    },
}

/// Errors raised while turning route configuration into matchers and rewriters.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid path_template: {0}")]
    Template(#[from] TemplateError),
    #[error("invalid path_template_rewrite: {0}")]
    Rewrite(#[from] RewriteParseError),
    #[error("failed to compile path template regex: {0}")]
    Regex(#[from] regex::Error),
    #[error("invalid typed_config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    #[error("didn't find a registered extension for name '{0}'")]
    UnknownExtension(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
