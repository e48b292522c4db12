//! Resolution of handler return values into HTTP responses.
//!
//! # Responsibilities
//! - Unwind `ContentType` / `WithStatus` wrappers
//! - Produce status, headers and body for each terminal value
//! - Conditional GET (ETag / If-None-Match) for JSON bodies
//! - Contain every failure as a logged, generic 500
//!
//! # Design Decisions
//! - One resolver per request, holding only that request's method, path and
//!   `If-None-Match`
//! - The outermost status wins; the innermost Content-Type wins, except
//!   that JSON always sends `application/json`
//! - Informational (1xx) codes are rejected: they cannot be a final status
//! - Redirects (303), not-modified (304) and failures (500) set their own
//!   status regardless of wrappers
//! - Bodies are fully materialized before the status line is chosen;
//!   readers are drained off the async worker on a multi-threaded runtime

use std::io::{self, Read};

use axum::{
    body::Body,
    http::{
        header::{self, InvalidHeaderValue},
        HeaderMap, HeaderValue, Method, Request, StatusCode,
    },
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use thiserror::Error;
use tokio::runtime::RuntimeFlavor;

use crate::http::etag::{generate_etag, if_none_match};
use crate::http::response::{BoxError, ResponseValue};

const APPLICATION_JSON: &str = "application/json";

/// Error type for response resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("status code {0} outside [200, 600)")]
    InvalidStatusCode(i32),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("failed to copy response stream: {0}")]
    Stream(#[source] std::io::Error),

    #[error("failed to execute template: {0}")]
    Template(#[source] BoxError),

    #[error("failed to encode JSON: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("handler error: {0}")]
    Handler(#[source] BoxError),
}

/// Per-request response resolver.
#[derive(Debug, Clone)]
pub struct Resolver {
    method: Method,
    path: String,
    if_none_match: Option<HeaderValue>,
}

impl Resolver {
    pub fn new(method: Method, path: impl Into<String>, if_none_match: Option<HeaderValue>) -> Self {
        Self {
            method,
            path: path.into(),
            if_none_match,
        }
    }

    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self::new(
            request.method().clone(),
            request.uri().path(),
            request.headers().get(header::IF_NONE_MATCH).cloned(),
        )
    }

    /// Resolve `value` into a response. Never fails: errors become a 500.
    pub fn resolve(&self, value: ResponseValue) -> Response {
        match self.try_resolve(value) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    method = %self.method,
                    path = %self.path,
                    error = %e,
                    "Failed to resolve response"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }

    fn try_resolve(&self, value: ResponseValue) -> Result<Response, ResolveError> {
        let mut headers = HeaderMap::new();
        let mut status: Option<StatusCode> = None;

        let mut value = value;
        let body = loop {
            value = match value {
                ResponseValue::ContentType {
                    content_type,
                    inner,
                } => {
                    headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(&content_type)?);
                    *inner
                }
                ResponseValue::WithStatus { status: code, inner } => {
                    status.get_or_insert(status_code(code)?);
                    *inner
                }
                ResponseValue::Status(code) => {
                    status.get_or_insert(status_code(code)?);
                    break Body::empty();
                }
                ResponseValue::Text(text) => break Body::from(text),
                ResponseValue::Bytes(bytes) => {
                    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(bytes.len()));
                    break Body::from(bytes);
                }
                ResponseValue::Reader(reader) => {
                    break Body::from(drain(reader).map_err(ResolveError::Stream)?);
                }
                ResponseValue::Template(template) => {
                    let mut buf = Vec::new();
                    template
                        .template
                        .execute(&template.data, &mut buf)
                        .map_err(ResolveError::Template)?;
                    break Body::from(buf);
                }
                ResponseValue::Redirect(target) => {
                    let target = if target.is_empty() { self.path.as_str() } else { target.as_str() };
                    headers.insert(header::LOCATION, HeaderValue::from_str(target)?);
                    return Ok(build(StatusCode::SEE_OTHER, headers, Body::empty()));
                }
                ResponseValue::Error(e) => return Err(ResolveError::Handler(e)),
                ResponseValue::Json(value) => {
                    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));

                    if self.method != Method::GET {
                        let mut buf = value.to_json()?;
                        buf.push(b'\n');
                        break Body::from(buf);
                    }

                    let buf = value.to_json()?;
                    let etag = generate_etag(&buf);
                    if if_none_match(self.if_none_match.as_ref(), &etag) {
                        tracing::debug!(path = %self.path, etag = %etag, "Not modified");
                        return Ok(build(StatusCode::NOT_MODIFIED, HeaderMap::new(), Body::empty()));
                    }
                    headers.insert(header::ETAG, HeaderValue::from_str(&etag)?);
                    break Body::from(Bytes::from(buf));
                }
            };
        };

        Ok(build(status.unwrap_or(StatusCode::OK), headers, body))
    }
}

/// Read a handler's reader to the end. Readers may block on I/O, so on a
/// multi-threaded runtime the worker is handed off first.
fn drain(mut reader: Box<dyn Read + Send>) -> io::Result<Vec<u8>> {
    let mut read = move || {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).map(|_| buf)
    };

    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(read)
        }
        _ => read(),
    }
}

fn status_code(code: i32) -> Result<StatusCode, ResolveError> {
    if !(200..600).contains(&code) {
        return Err(ResolveError::InvalidStatusCode(code));
    }
    u16::try_from(code)
        .ok()
        .and_then(|c| StatusCode::from_u16(c).ok())
        .ok_or(ResolveError::InvalidStatusCode(code))
}

fn build(status: StatusCode, headers: HeaderMap, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
