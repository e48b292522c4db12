//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! app.yaml (handlers: section)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (target checks, drop incomplete records)
//!     → Vec<Rule> (validated, ordered, immutable)
//!     → routing::StaticRouter (compiled once at startup)
//!
//! Process environment
//!     → environment.rs (production flag, port)
//!     → ServeConfig (bootstrap decisions)
//! ```
//!
//! # Design Decisions
//! - Rules are immutable once loaded; there is no reload path
//! - Record order is preserved because it is match precedence
//! - Validation separates syntactic (serde) from semantic checks

pub mod environment;
pub mod loader;
pub mod schema;
pub mod validation;

pub use environment::Environment;
pub use loader::{load_rules, parse_rules, ConfigError};
pub use schema::{HandlerRecord, Rule, RuleTarget, ServeConfig};
