//! Handler return values.
//!
//! A handler returns a [`ResponseValue`] instead of writing to the response
//! itself; [`Resolver`](crate::http::resolver::Resolver) turns it into the
//! status line, headers and body.
//!
//! # Variants
//! - `Status`: bare status code, empty body
//! - `Text`: written verbatim, no Content-Type inferred
//! - `Bytes`: written verbatim with an explicit Content-Length
//! - `Reader`: copied verbatim from a byte source
//! - `Template`: rendered against its data
//! - `Redirect`: 303 See Other (empty target means the current path)
//! - `Error`: logged, answered with a generic 500
//! - `ContentType` / `WithStatus`: wrappers overriding one aspect of an
//!   inner value
//! - `Json`: anything else serializable, with ETag support on GET

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;

/// Error type handlers and templates report failures with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Renders data into a response body.
pub trait Template: Send + Sync {
    fn execute(&self, data: &serde_json::Value, out: &mut Vec<u8>) -> Result<(), BoxError>;
}

impl<F> Template for F
where
    F: Fn(&serde_json::Value, &mut Vec<u8>) -> Result<(), BoxError> + Send + Sync,
{
    fn execute(&self, data: &serde_json::Value, out: &mut Vec<u8>) -> Result<(), BoxError> {
        self(data, out)
    }
}

/// A template paired with the data it renders.
#[derive(Clone)]
pub struct TemplateResponse {
    pub template: Arc<dyn Template>,
    pub data: serde_json::Value,
}

/// A value serialized as the JSON response body.
pub trait JsonBody: Send {
    fn to_json(&self) -> serde_json::Result<Vec<u8>>;
}

impl<T> JsonBody for T
where
    T: Serialize + Send,
{
    fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Everything a handler may return.
pub enum ResponseValue {
    Status(i32),
    Text(String),
    Bytes(Bytes),
    Reader(Box<dyn Read + Send>),
    Template(TemplateResponse),
    Redirect(String),
    Error(BoxError),
    ContentType {
        content_type: String,
        inner: Box<ResponseValue>,
    },
    WithStatus {
        status: i32,
        inner: Box<ResponseValue>,
    },
    Json(Box<dyn JsonBody>),
}

impl ResponseValue {
    pub fn status(code: i32) -> Self {
        Self::Status(code)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn bytes(bytes: impl Into<Bytes>) -> Self {
        Self::Bytes(bytes.into())
    }

    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Self::Reader(Box::new(reader))
    }

    pub fn template(template: Arc<dyn Template>, data: serde_json::Value) -> Self {
        Self::Template(TemplateResponse { template, data })
    }

    /// 303 See Other to `target`; an empty target redirects to the request path.
    pub fn redirect(target: impl Into<String>) -> Self {
        Self::Redirect(target.into())
    }

    pub fn error(error: impl Into<BoxError>) -> Self {
        Self::Error(error.into())
    }

    /// Serialize `value` as the JSON body.
    pub fn json<T>(value: T) -> Self
    where
        T: Serialize + Send + 'static,
    {
        Self::Json(Box::new(value))
    }

    /// Wrap this value with a Content-Type override.
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        Self::ContentType {
            content_type: content_type.into(),
            inner: Box::new(self),
        }
    }

    /// Wrap this value with a status override.
    pub fn with_status(self, status: i32) -> Self {
        Self::WithStatus {
            status,
            inner: Box::new(self),
        }
    }
}

impl fmt::Debug for ResponseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => f.debug_tuple("Status").field(code).finish(),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Reader(_) => f.write_str("Reader"),
            Self::Template(t) => f.debug_tuple("Template").field(&t.data).finish(),
            Self::Redirect(target) => f.debug_tuple("Redirect").field(target).finish(),
            Self::Error(e) => f.debug_tuple("Error").field(e).finish(),
            Self::ContentType {
                content_type,
                inner,
            } => f
                .debug_struct("ContentType")
                .field("content_type", content_type)
                .field("inner", inner)
                .finish(),
            Self::WithStatus { status, inner } => f
                .debug_struct("WithStatus")
                .field("status", status)
                .field("inner", inner)
                .finish(),
            Self::Json(_) => f.write_str("Json"),
        }
    }
}

impl From<&str> for ResponseValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ResponseValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<u8>> for ResponseValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes.into())
    }
}

impl From<Bytes> for ResponseValue {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<i32> for ResponseValue {
    fn from(code: i32) -> Self {
        Self::Status(code)
    }
}

impl<E> From<Result<ResponseValue, E>> for ResponseValue
where
    E: Into<BoxError>,
{
    fn from(result: Result<ResponseValue, E>) -> Self {
        result.unwrap_or_else(|e| Self::Error(e.into()))
    }
}
