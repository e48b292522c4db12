//! devserve: local stand-in for the hosting platform's front end.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ TraceLayer ──▶ static rules ──match──▶ ServeDir / ServeFile
//!                                        │
//!                                    no match
//!                                        ▼
//!                                  [CORS] ──▶ handler ──▶ ResponseValue
//!                                                              │
//!     Client Response ◀──────────────── Resolver ◀─────────────┘
//! ```
//!
//! Static rules come from the `handlers:` section of an `app.yaml` and are
//! only emulated locally; on the platform (`GAE_DEPLOYMENT_ID` set) they are
//! enforced natively and skipped here.

use std::path::PathBuf;

use axum::{body::Body, http::Request};
use clap::Parser;
use serde::Serialize;

use devserve::config::{Environment, ServeConfig};
use devserve::http::{Handlers, ResponseValue};
use devserve::lifecycle::{self, Shutdown};
use devserve::observability::logging;

#[derive(Parser)]
#[command(name = "devserve")]
#[command(about = "Serve an app locally with its app.yaml static handlers", long_about = None)]
struct Cli {
    /// app.yaml whose static handlers are emulated
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (defaults to $PORT, then 8080)
    #[arg(short, long)]
    port: Option<u16>,

    /// Add permissive CORS headers to handler responses
    #[arg(long)]
    cors: bool,
}

#[derive(Serialize)]
struct Status {
    name: &'static str,
    version: &'static str,
}

async fn hi(_request: Request<Body>) -> ResponseValue {
    ResponseValue::text("Hello, there!")
}

async fn status(_request: Request<Body>) -> ResponseValue {
    ResponseValue::json(Status {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn not_found(request: Request<Body>) -> ResponseValue {
    tracing::info!(path = %request.uri().path(), "Unhandled request");
    ResponseValue::status(404)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let cli = Cli::parse();
    let env = Environment::detect_with_port(cli.port)?;

    let config = ServeConfig {
        bind_address: env.bind_address(),
        static_config: cli.config,
        cors: cli.cors,
        production: env.production,
    };

    tracing::info!(
        bind_address = %config.bind_address,
        production = config.production,
        "devserve v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let handlers = Handlers::new()
        .handle("/hi", hi)
        .handle("/status", status)
        .fallback(not_found);

    let shutdown = Shutdown::new();
    lifecycle::serve(&config, handlers, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
