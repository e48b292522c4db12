//! Rule pattern compilation and matching.
//!
//! # Responsibilities
//! - Anchor each rule's URL pattern into a regex
//! - Match request paths, yielding the target to serve
//! - Expand `\N` back-references in file targets
//!
//! # Design Decisions
//! - File rules anchor the whole path (`^url$`)
//! - Directory rules match a prefix ending in `/`, so `/foo` never
//!   matches `/foobar`
//! - A back-reference to group 0 or to a group the pattern does not have
//!   expands to an empty string, as it does on the hosting platform; such
//!   rules are flagged with a warning when compiled

use regex::{Captures, Regex};
use thiserror::Error;

use crate::config::schema::{Rule, RuleTarget};

/// Error type for pattern compilation.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("static url {url:?} must begin with /")]
    MissingLeadingSlash { url: String },

    #[error("static url {url:?} is not a valid pattern: {source}")]
    Invalid {
        url: String,
        #[source]
        source: regex::Error,
    },
}

/// Where a matched request should be served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServeTarget {
    /// Serve `suffix` relative to the directory `root`.
    Dir { root: String, suffix: String },
    /// Serve exactly this file.
    File(String),
}

/// A rule paired with its anchored pattern.
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    rule: Rule,
    pattern: Regex,
}

impl CompiledMatcher {
    /// Compile a rule's URL pattern.
    pub fn compile(rule: Rule) -> Result<Self, PatternError> {
        if !rule.url_pattern.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash {
                url: rule.url_pattern,
            });
        }

        let anchored = match &rule.target {
            RuleTarget::Files(_) => format!("^{}$", rule.url_pattern),
            RuleTarget::Dir(_) if rule.url_pattern.ends_with('/') => {
                format!("^{}", rule.url_pattern)
            }
            RuleTarget::Dir(_) => format!("^{}/", rule.url_pattern),
        };

        let pattern = match Regex::new(&anchored) {
            Ok(pattern) => pattern,
            Err(source) => {
                return Err(PatternError::Invalid {
                    url: rule.url_pattern,
                    source,
                })
            }
        };

        if let RuleTarget::Files(template) = &rule.target {
            let groups = pattern.captures_len();
            for index in backref_indexes(template) {
                if index == 0 || index >= groups {
                    tracing::warn!(
                        url = %rule.url_pattern,
                        static_files = %template,
                        index,
                        "Back-reference to a missing group expands to nothing"
                    );
                }
            }
        }

        Ok(Self { rule, pattern })
    }

    /// The rule this matcher was built from.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Match a decoded request path.
    pub fn matches(&self, path: &str) -> Option<ServeTarget> {
        let captures = self.pattern.captures(path)?;

        match &self.rule.target {
            RuleTarget::Dir(root) => {
                let prefix_len = captures.get(0).map_or(0, |m| m.end());
                Some(ServeTarget::Dir {
                    root: root.clone(),
                    suffix: path[prefix_len..].to_string(),
                })
            }
            RuleTarget::Files(template) => {
                Some(ServeTarget::File(expand_backrefs(template, &captures)))
            }
        }
    }
}

/// Compile rules, preserving order.
pub fn compile_rules(rules: Vec<Rule>) -> Result<Vec<CompiledMatcher>, PatternError> {
    rules.into_iter().map(CompiledMatcher::compile).collect()
}

/// Split `template` into literal text and `\N` back-reference indexes.
/// A backslash not followed by digits is literal.
fn tokens(template: &str) -> impl Iterator<Item = Token<'_>> {
    let mut rest = template;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some(pos) = rest.find('\\') else {
            let literal = rest;
            rest = "";
            return Some(Token::Literal(literal));
        };
        if pos > 0 {
            let literal = &rest[..pos];
            rest = &rest[pos..];
            return Some(Token::Literal(literal));
        }

        let after = &rest[1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            rest = after;
            return Some(Token::Literal("\\"));
        }

        // Saturate absurdly long indexes; they are out of range either way.
        let index = after[..digits].parse().unwrap_or(usize::MAX);
        rest = &after[digits..];
        Some(Token::Group(index))
    })
}

enum Token<'a> {
    Literal(&'a str),
    Group(usize),
}

fn backref_indexes(template: &str) -> impl Iterator<Item = usize> + '_ {
    tokens(template).filter_map(|token| match token {
        Token::Group(index) => Some(index),
        Token::Literal(_) => None,
    })
}

/// Replace `\N` with capture group N. Group 0, a group the pattern does not
/// have, and a group that did not participate all expand to nothing.
fn expand_backrefs(template: &str, captures: &Captures<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    for token in tokens(template) {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Group(0) => {}
            Token::Group(index) => {
                if let Some(group) = captures.get(index) {
                    out.push_str(group.as_str());
                }
            }
        }
    }
    out
}
