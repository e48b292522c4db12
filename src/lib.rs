//! Local development server for serverless-platform apps.
//!
//! Enacts the static handlers of an `app.yaml` in front of ordinary axum
//! handlers, and lets handlers return a [`ResponseValue`] instead of
//! building responses by hand.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::{Environment, Rule, ServeConfig};
pub use http::{Handlers, HttpServer, ResponseValue};
pub use lifecycle::Shutdown;
pub use routing::StaticRouter;
