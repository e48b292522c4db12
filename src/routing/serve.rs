//! Static rule middleware.
//!
//! Serves requests matching a static rule from the filesystem and passes
//! everything else, untouched, to the wrapped handlers.

use std::path::{Component, Path};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, Request, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::schema::Rule;
use crate::routing::matcher::ServeTarget;
use crate::routing::router::StaticRouter;

/// Characters escaped when a decoded suffix is put back into a URI path.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Middleware enacting static rules in front of the application handlers.
///
/// Install with `axum::middleware::from_fn_with_state(router, static_files)`.
pub async fn static_files(
    State(router): State<Arc<StaticRouter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = percent_decode_str(request.uri().path())
        .decode_utf8_lossy()
        .into_owned();

    let Some(route) = router.route(&path) else {
        return next.run(request).await;
    };

    tracing::debug!(
        path = %path,
        rule = %route.rule.url_pattern,
        target = ?route.target,
        "Static rule matched"
    );

    let mut response = match route.target {
        ServeTarget::Dir { root, suffix } => serve_dir(&root, &suffix, request).await,
        ServeTarget::File(file) => serve_file(&file, request).await,
    };

    apply_rule_headers(route.rule, response.headers_mut());
    response
}

/// Serve `suffix` from inside `root`. `ServeDir` rejects `..` segments.
async fn serve_dir(root: &str, suffix: &str, request: Request<Body>) -> Response {
    let (mut parts, body) = request.into_parts();

    let encoded = utf8_percent_encode(suffix, PATH);
    let rewritten = match parts.uri.query() {
        Some(query) => format!("/{encoded}?{query}"),
        None => format!("/{encoded}"),
    };
    parts.uri = match rewritten.parse::<Uri>() {
        Ok(uri) => uri,
        Err(e) => {
            tracing::warn!(suffix = %suffix, error = %e, "Unroutable static suffix");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let request = Request::from_parts(parts, body);
    match ServeDir::new(root).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

/// Serve a single resolved file, refusing paths that climb out with `..`.
async fn serve_file(file: &str, request: Request<Body>) -> Response {
    if Path::new(file)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        tracing::warn!(file = %file, "Refusing static file path with parent segment");
        return (StatusCode::BAD_REQUEST, "invalid URL path").into_response();
    }

    match ServeFile::new(file).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

/// Apply configured headers, then the MIME override so it wins.
fn apply_rule_headers(rule: &Rule, headers: &mut HeaderMap) {
    for (name, value) in &rule.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Skipping invalid static rule header"),
        }
    }

    if let Some(mime) = &rule.mime_type {
        match HeaderValue::from_str(mime) {
            Ok(value) => {
                headers.insert(header::CONTENT_TYPE, value);
            }
            Err(_) => tracing::warn!(mime_type = %mime, "Skipping invalid static rule mime type"),
        }
    }
}
