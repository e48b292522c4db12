//! Static rule lookup.
//!
//! # Responsibilities
//! - Store compiled matchers in configuration order
//! - Look up the first matcher for a request path
//! - Return the matched rule and its serve target, or no match
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - O(n) ordered scan; precedence is configuration order, not specificity
//! - Explicit `None` on no match so the caller decides the fallback

use std::path::Path;

use thiserror::Error;

use crate::config::loader::{load_rules, ConfigError};
use crate::config::schema::Rule;
use crate::routing::matcher::{compile_rules, CompiledMatcher, PatternError, ServeTarget};

/// Error type for building a router from a configuration file.
#[derive(Debug, Error)]
pub enum StaticRouterError {
    #[error("invalid static configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid static rule: {0}")]
    Pattern(#[from] PatternError),
}

/// A successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// The first rule whose pattern matched.
    pub rule: &'a Rule,
    /// What to serve for it.
    pub target: ServeTarget,
}

/// Ordered set of compiled static rules.
#[derive(Debug, Clone, Default)]
pub struct StaticRouter {
    matchers: Vec<CompiledMatcher>,
}

impl StaticRouter {
    /// Compile rules into a router.
    pub fn new(rules: Vec<Rule>) -> Result<Self, PatternError> {
        let matchers = compile_rules(rules)?;
        Ok(Self { matchers })
    }

    /// Load an `app.yaml` and compile its static handlers.
    pub fn from_file(path: &Path) -> Result<Self, StaticRouterError> {
        let rules = load_rules(path)?;
        Ok(Self::new(rules)?)
    }

    /// Find the first rule matching a decoded request path.
    pub fn route(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.matchers.iter().find_map(|matcher| {
            matcher.matches(path).map(|target| RouteMatch {
                rule: matcher.rule(),
                target,
            })
        })
    }

    /// Number of compiled rules.
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
