//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → tower_http TraceLayer spans per request
//!
//! Consumers:
//!     → logging.rs (fmt subscriber, stdout)
//! ```

pub mod logging;
