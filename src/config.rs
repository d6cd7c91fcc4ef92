//! Route configuration messages and the factories that turn them into
//! matchers and rewriters.
//!
//! A route carries each extension as a [`TypedExtensionConfig`]: the name of
//! the extension plus its own configuration as JSON. Templates are validated
//! when the extension is created, so a bad template fails route setup rather
//! than a request.

use crate::error::{ConfigError, Result};
use crate::matcher::{PathMatcher, PatternTemplateMatcher, MATCHER_NAME};
use crate::rewriter::{PathRewriter, PatternTemplateRewriter, REWRITER_NAME};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub const MATCH_CATEGORY: &str = "path.match";
pub const REWRITE_CATEGORY: &str = "path.rewrite";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternTemplateMatchConfig {
    pub path_template: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternTemplateRewriteConfig {
    pub path_template_rewrite: String,
}

/// An extension reference as it appears in route configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedExtensionConfig {
    pub name: String,
    pub typed_config: serde_json::Value,
}

pub trait PathMatcherFactory: Send + Sync {
    fn name(&self) -> &str;

    fn category(&self) -> &str {
        MATCH_CATEGORY
    }

    fn create_path_matcher(&self, config: &serde_json::Value) -> Result<Arc<dyn PathMatcher>>;
}

pub trait PathRewriterFactory: Send + Sync {
    fn name(&self) -> &str;

    fn category(&self) -> &str {
        REWRITE_CATEGORY
    }

    fn create_path_rewriter(&self, config: &serde_json::Value) -> Result<Arc<dyn PathRewriter>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PatternTemplateMatcherFactory;

impl PathMatcherFactory for PatternTemplateMatcherFactory {
    fn name(&self) -> &str {
        MATCHER_NAME
    }

    fn create_path_matcher(&self, config: &serde_json::Value) -> Result<Arc<dyn PathMatcher>> {
        let config = PatternTemplateMatchConfig::deserialize(config)?;
        let matcher = PatternTemplateMatcher::new(config.path_template)?;
        tracing::debug!(
            path_template = matcher.pattern(),
            regex = matcher.regex_source(),
            "created path matcher"
        );
        Ok(Arc::new(matcher))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PatternTemplateRewriterFactory;

impl PathRewriterFactory for PatternTemplateRewriterFactory {
    fn name(&self) -> &str {
        REWRITER_NAME
    }

    fn create_path_rewriter(&self, config: &serde_json::Value) -> Result<Arc<dyn PathRewriter>> {
        let config = PatternTemplateRewriteConfig::deserialize(config)?;
        let rewriter = PatternTemplateRewriter::new(config.path_template_rewrite)?;
        tracing::debug!(
            path_template_rewrite = rewriter.pattern(),
            "created path rewriter"
        );
        Ok(Arc::new(rewriter))
    }
}

/// Factories keyed by extension name.
pub struct ExtensionRegistry {
    matchers: HashMap<String, Box<dyn PathMatcherFactory>>,
    rewriters: HashMap<String, Box<dyn PathRewriterFactory>>,
}

impl ExtensionRegistry {
    /// A registry with no factories installed.
    pub fn empty() -> Self {
        Self {
            matchers: HashMap::new(),
            rewriters: HashMap::new(),
        }
    }

    pub fn register_matcher(&mut self, factory: impl PathMatcherFactory + 'static) -> &mut Self {
        self.matchers
            .insert(factory.name().to_string(), Box::new(factory));
        self
    }

    pub fn register_rewriter(&mut self, factory: impl PathRewriterFactory + 'static) -> &mut Self {
        self.rewriters
            .insert(factory.name().to_string(), Box::new(factory));
        self
    }

    pub fn create_path_matcher(
        &self,
        config: &TypedExtensionConfig,
    ) -> Result<Arc<dyn PathMatcher>> {
        let factory = self
            .matchers
            .get(&config.name)
            .ok_or_else(|| ConfigError::UnknownExtension(config.name.clone()))?;
        factory.create_path_matcher(&config.typed_config)
    }

    pub fn create_path_rewriter(
        &self,
        config: &TypedExtensionConfig,
    ) -> Result<Arc<dyn PathRewriter>> {
        let factory = self
            .rewriters
            .get(&config.name)
            .ok_or_else(|| ConfigError::UnknownExtension(config.name.clone()))?;
        factory.create_path_rewriter(&config.typed_config)
    }
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register_matcher(PatternTemplateMatcherFactory)
            .register_rewriter(PatternTemplateRewriterFactory);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RewriteParseError, TemplateError};
    use serde_json::json;

    #[test]
    fn test_match_config_roundtrip() {
        let config: PatternTemplateMatchConfig =
            serde_json::from_value(json!({ "path_template": "/bar/{lang}" })).unwrap();
        assert_eq!(config.path_template, "/bar/{lang}");
    }

    #[test]
    fn test_unknown_config_field() {
        let result = PatternTemplateMatcherFactory
            .create_path_matcher(&json!({ "path_template": "/a", "extra": true }));
        assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn test_factory_names() {
        assert_eq!(PatternTemplateMatcherFactory.name(), MATCHER_NAME);
        assert_eq!(PatternTemplateMatcherFactory.category(), "path.match");
        assert_eq!(PatternTemplateRewriterFactory.name(), REWRITER_NAME);
        assert_eq!(PatternTemplateRewriterFactory.category(), "path.rewrite");
    }

    #[test]
    fn test_factories_validate_templates() {
        assert!(matches!(
            PatternTemplateMatcherFactory.create_path_matcher(&json!({ "path_template": "bar" })),
            Err(ConfigError::Template(TemplateError::MissingLeadingSeparator))
        ));
        assert!(matches!(
            PatternTemplateRewriterFactory
                .create_path_rewriter(&json!({ "path_template_rewrite": "/a/{b" })),
            Err(ConfigError::Rewrite(RewriteParseError::UnmatchedBracket))
        ));
    }

    #[test]
    fn test_registry_unknown_extension() {
        let registry = ExtensionRegistry::empty();
        let config = TypedExtensionConfig {
            name: MATCHER_NAME.to_string(),
            typed_config: json!({ "path_template": "/a" }),
        };
        assert!(matches!(
            registry.create_path_matcher(&config),
            Err(ConfigError::UnknownExtension(name)) if name == MATCHER_NAME
        ));
    }

    #[test]
    fn test_registry_default() {
        let registry = ExtensionRegistry::default();
        let config = TypedExtensionConfig {
            name: MATCHER_NAME.to_string(),
            typed_config: json!({ "path_template": "/bar/{lang}" }),
        };
        let matcher = registry.create_path_matcher(&config).unwrap();
        assert!(matcher.matches("/bar/en"));
    }
}
