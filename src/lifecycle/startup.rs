//! Startup orchestration.
//!
//! # Responsibilities
//! - Decide whether static rules are emulated (local only)
//! - Load and compile the rules before any listener exists
//! - Assemble the HttpServer
//!
//! # Design Decisions
//! - Fail fast: a bad `app.yaml` is fatal, no partially configured server
//! - In production the platform enforces the same rules natively, so they
//!   are not loaded at all

use tokio::net::TcpListener;

use crate::config::ServeConfig;
use crate::http::{Handlers, HttpServer};
use crate::lifecycle::Shutdown;
use crate::routing::{StaticRouter, StaticRouterError};

/// Error type for bootstrap failures.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Static(#[from] StaticRouterError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the server for `config`, loading static rules when emulating.
pub fn build_server(config: &ServeConfig, handlers: Handlers) -> Result<HttpServer, StartupError> {
    let mut server = HttpServer::new(handlers).with_cors(config.cors);

    match (&config.static_config, config.production) {
        (Some(path), false) => {
            let router = StaticRouter::from_file(path)?;
            tracing::info!(
                path = %path.display(),
                rules = router.len(),
                "Static handler emulation enabled"
            );
            server = server.with_static_router(router);
        }
        (Some(path), true) => {
            tracing::info!(
                path = %path.display(),
                "Running in production, static handlers enforced by the platform"
            );
        }
        (None, _) => {
            tracing::debug!("No static configuration given");
        }
    }

    Ok(server)
}

/// Bind the configured address and serve until `shutdown` fires.
pub async fn serve(config: &ServeConfig, handlers: Handlers, shutdown: &Shutdown) -> Result<(), StartupError> {
    let server = build_server(config, handlers)?;

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.bind_address.clone(),
            source,
        })?;

    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
