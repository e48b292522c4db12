//! Process environment as seen by the hosting platform.
//!
//! The platform sets `GAE_DEPLOYMENT_ID` on every deployed instance and
//! tells the process which port to bind through `PORT`.

use std::env;

/// Port used when `PORT` is unset or empty.
pub const DEFAULT_PORT: u16 = 8080;

const DEPLOYMENT_ID_VAR: &str = "GAE_DEPLOYMENT_ID";
const PORT_VAR: &str = "PORT";

/// Error type for environment inspection.
#[derive(Debug, thiserror::Error)]
#[error("invalid PORT value {value:?}")]
pub struct InvalidPort {
    pub value: String,
}

/// Snapshot of the relevant environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    /// Running on the hosting platform rather than locally.
    pub production: bool,
    /// Port to listen on.
    pub port: u16,
}

impl Environment {
    /// Read the current process environment. An explicit `port` takes
    /// precedence over `PORT`, which is then not parsed at all.
    pub fn detect_with_port(port: Option<u16>) -> Result<Self, InvalidPort> {
        Self::from_vars(env::var(DEPLOYMENT_ID_VAR).ok(), env::var(PORT_VAR).ok(), port)
    }

    fn from_vars(
        deployment_id: Option<String>,
        port_var: Option<String>,
        port: Option<u16>,
    ) -> Result<Self, InvalidPort> {
        let production = deployment_id.is_some_and(|id| !id.is_empty());
        let port = match (port, port_var.filter(|p| !p.is_empty())) {
            (Some(port), _) => port,
            (None, Some(value)) => value.parse().map_err(|_| InvalidPort { value })?,
            (None, None) => DEFAULT_PORT,
        };
        Ok(Self { production, port })
    }

    /// Bind address for all interfaces on the configured port.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
