//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Environment → static rules (local only) → HttpServer → bind listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or trigger() → stop accepting → drain in-flight requests → exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: rules compiled before the listener is bound
//! - Request lifetime is bounded by the host server, no timeouts added here

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{build_server, serve, StartupError};
