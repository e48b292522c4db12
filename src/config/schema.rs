//! Configuration schema definitions.
//!
//! Two layers live here:
//! - the raw `app.yaml` records exactly as serde reads them
//!   ([`AppYaml`], [`HandlerRecord`])
//! - the validated [`Rule`] the router is built from
//!
//! Plus the server settings used by the binary ([`ServeConfig`]).

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

/// The parts of an `app.yaml` document this crate reads.
///
/// Every other top-level key (`runtime`, `env_variables`, ...) is ignored.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppYaml {
    /// Handler records, in precedence order.
    pub handlers: Vec<HandlerRecord>,
}

/// One entry of the `handlers:` list, before validation.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct HandlerRecord {
    /// URL pattern (a regex, must start with `/`).
    pub url: String,

    /// File target, may embed `\1`, `\2`... back-references.
    pub static_files: Option<String>,

    /// Directory target.
    pub static_dir: Option<String>,

    /// Content-Type override.
    pub mime_type: Option<String>,

    /// Extra response headers.
    pub http_headers: HashMap<String, String>,
}

/// What a matched rule serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleTarget {
    /// A single file path template (`static_files`).
    Files(String),
    /// A directory root (`static_dir`).
    Dir(String),
}

/// A validated static routing directive.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub url_pattern: String,
    pub target: RuleTarget,
    pub mime_type: Option<String>,
    pub headers: HashMap<String, String>,
}

impl Rule {
    /// Create a rule serving files from a path template.
    pub fn files(url_pattern: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            url_pattern: url_pattern.into(),
            target: RuleTarget::Files(path.into()),
            mime_type: None,
            headers: HashMap::new(),
        }
    }

    /// Create a rule serving a directory.
    pub fn dir(url_pattern: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            url_pattern: url_pattern.into(),
            target: RuleTarget::Dir(root.into()),
            mime_type: None,
            headers: HashMap::new(),
        }
    }

    /// Set the Content-Type override.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Add a response header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Settings for the development server binary.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Path to the `app.yaml` whose handlers are emulated.
    pub static_config: Option<PathBuf>,

    /// Wrap every handler with the CORS middleware.
    pub cors: bool,

    /// Whether the process runs on the hosting platform itself.
    pub production: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            static_config: None,
            cors: false,
            production: false,
        }
    }
}
