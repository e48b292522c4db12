//! Handler registration.
//!
//! Handlers are async functions from a request to a [`ResponseValue`]. The
//! registry is an ordinary value: build it, pass it to the server, and drop
//! it with the server. Nothing is registered globally.

use std::future::Future;

use axum::{body::Body, http::Request, response::Response, routing::any, Router};

use crate::http::resolver::Resolver;
use crate::http::response::ResponseValue;

/// Ordered set of path handlers plus a fallback.
#[derive(Debug, Default)]
pub struct Handlers {
    router: Router,
    has_fallback: bool,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every method on `path` (axum path syntax,
    /// e.g. `/items/{id}`).
    pub fn handle<F, Fut>(mut self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Body>) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = ResponseValue> + Send + 'static,
    {
        self.router = self
            .router
            .route(path, any(move |request: Request<Body>| serve(handler.clone(), request)));
        self
    }

    /// Handler for requests no registered path matches.
    pub fn fallback<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Request<Body>) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = ResponseValue> + Send + 'static,
    {
        self.router = self
            .router
            .fallback(move |request: Request<Body>| serve(handler.clone(), request));
        self.has_fallback = true;
        self
    }

    /// Convert into an axum router. Without an explicit fallback, unmatched
    /// requests resolve to a bare 404.
    pub fn into_router(self) -> Router {
        if self.has_fallback {
            self.router
        } else {
            self.router
                .fallback(|request: Request<Body>| serve(not_found, request))
        }
    }
}

/// Run `handler` and resolve what it returns against the request it saw.
pub async fn serve<F, Fut>(handler: F, request: Request<Body>) -> Response
where
    F: FnOnce(Request<Body>) -> Fut,
    Fut: Future<Output = ResponseValue>,
{
    let resolver = Resolver::from_request(&request);
    let value = handler(request).await;
    resolver.resolve(value)
}

async fn not_found(_request: Request<Body>) -> ResponseValue {
    ResponseValue::Status(404)
}
