//! HTTP server setup.
//!
//! # Responsibilities
//! - Compose the application handlers into one axum Router
//! - Put the static rule middleware in front of them when emulation is on
//! - Optionally wrap handlers with CORS
//! - Wire up request tracing
//! - Serve on a listener until shutdown

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::http::handler::Handlers;
use crate::http::middleware::cors;
use crate::routing::{static_files, StaticRouter};

/// HTTP server for the application.
pub struct HttpServer {
    handlers: Handlers,
    static_router: Option<Arc<StaticRouter>>,
    cors: bool,
}

impl HttpServer {
    /// Create a server for `handlers` with no static emulation and no CORS.
    pub fn new(handlers: Handlers) -> Self {
        Self {
            handlers,
            static_router: None,
            cors: false,
        }
    }

    /// Serve matching requests from static rules before the handlers run.
    pub fn with_static_router(mut self, router: StaticRouter) -> Self {
        self.static_router = Some(Arc::new(router));
        self
    }

    /// Wrap the handlers with the CORS middleware.
    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }

    /// Whether static rules are emulated.
    pub fn emulates_static(&self) -> bool {
        self.static_router.is_some()
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layer order, outermost first: trace, static rules, CORS, handlers.
    pub fn into_router(self) -> Router {
        let mut router = self.handlers.into_router();

        if self.cors {
            router = router.layer(axum::middleware::from_fn(cors));
        }

        if let Some(static_router) = self.static_router {
            router = router.layer(axum::middleware::from_fn_with_state(
                static_router,
                static_files,
            ));
        }

        router.layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires or Ctrl+C is received.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            static_emulation = self.emulates_static(),
            cors = self.cors,
            "HTTP server starting"
        );

        axum::serve(listener, self.into_router())
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for the shutdown broadcast or Ctrl+C.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = shutdown.recv() => {},
        () = ctrl_c => {},
    }
    tracing::info!("Shutdown signal received");
}
