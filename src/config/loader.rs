//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{AppYaml, Rule};
use crate::config::validation::validate_records;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("handler {url:?} can't specify both static_files and static_dir")]
    ConflictingTargets { url: String },
}

/// Load and validate static handler rules from an `app.yaml` file.
pub fn load_rules(path: &Path) -> Result<Vec<Rule>, ConfigError> {
    let content = fs::read_to_string(path)?;
    let rules = parse_rules(&content)?;

    tracing::info!(path = %path.display(), rules = rules.len(), "Static handlers loaded");
    Ok(rules)
}

/// Parse and validate static handler rules from YAML text.
pub fn parse_rules(content: &str) -> Result<Vec<Rule>, ConfigError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let parsed: AppYaml = serde_yaml::from_str(content)?;

    validate_records(parsed.handlers)
}
