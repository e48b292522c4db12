//! Static routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → serve.rs (middleware, percent-decode path)
//!     → router.rs (ordered lookup)
//!     → matcher.rs (anchored regex, back-reference expansion)
//!     → Match: ServeDir / ServeFile + rule headers
//!     → No match: wrapped handlers, request unchanged
//!
//! Rule Compilation (at startup):
//!     Rule[] (from config::loader)
//!     → Anchor patterns (file: whole path, dir: prefix + '/')
//!     → Freeze as immutable StaticRouter
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - Deterministic: same path always matches the same rule
//! - First match wins (configuration order)

pub mod matcher;
pub mod router;
pub mod serve;

pub use matcher::{CompiledMatcher, PatternError, ServeTarget};
pub use router::{RouteMatch, StaticRouter, StaticRouterError};
pub use serve::static_files;
