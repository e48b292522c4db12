//! HTTP handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, trace layer)
//!     → [routing::serve static rules, local only]
//!     → middleware/ (CORS, optional)
//!     → handler.rs (registered handler → ResponseValue)
//!     → resolver.rs (status, headers, body; etag.rs for JSON on GET)
//!     → Send to client
//! ```

pub mod etag;
pub mod handler;
pub mod middleware;
pub mod resolver;
pub mod response;
pub mod server;

pub use handler::Handlers;
pub use resolver::{ResolveError, Resolver};
pub use response::{BoxError, ResponseValue, Template};
pub use server::HttpServer;
