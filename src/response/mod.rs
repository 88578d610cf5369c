//! Response model.
//!
//! # Responsibilities
//! - Define the [`Response`] contract actions and middleware return
//! - Provide the concrete variants (HTML, JSON, error, redirect, template)
//! - Snapshot and decorate responses for stateful middleware
//!
//! # Design Decisions
//! - A response yields its body lazily through `body()`; rendering failures
//!   surface as [`ResponseError`] and become a 500 at the dispatch boundary.
//! - `Result<R, E>` is itself a response when both sides are, so actions can
//!   use `?` on request accessors and return the error branch directly.

mod error;
mod html;
mod json;
mod redirect;
mod template;

pub use error::ErrorResponse;
pub use html::HtmlResponse;
pub use json::JsonResponse;
pub use redirect::RedirectResponse;
pub use template::TemplateResponse;

use std::path::PathBuf;

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use thiserror::Error;

/// Failure while producing a response body.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("failed to serialize response body: {0}")]
    Serialize(String),

    #[error("failed to read template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to render template {path}: {source}")]
    TemplateRender {
        path: PathBuf,
        source: minijinja::Error,
    },
}

/// Anything the dispatcher can write back to a client.
pub trait Response: Send + 'static {
    fn headers(&self) -> HeaderMap;

    fn body(&self) -> Result<Bytes, ResponseError>;

    fn status_code(&self) -> StatusCode;

    fn boxed(self) -> BoxResponse
    where
        Self: Sized,
    {
        Box::new(self)
    }
}

pub type BoxResponse = Box<dyn Response>;

impl Response for BoxResponse {
    fn headers(&self) -> HeaderMap {
        (**self).headers()
    }

    fn body(&self) -> Result<Bytes, ResponseError> {
        (**self).body()
    }

    fn status_code(&self) -> StatusCode {
        (**self).status_code()
    }

    fn boxed(self) -> BoxResponse {
        self
    }
}

impl<R, E> Response for Result<R, E>
where
    R: Response,
    E: Response,
{
    fn headers(&self) -> HeaderMap {
        match self {
            Ok(r) => r.headers(),
            Err(e) => e.headers(),
        }
    }

    fn body(&self) -> Result<Bytes, ResponseError> {
        match self {
            Ok(r) => r.body(),
            Err(e) => e.body(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Ok(r) => r.status_code(),
            Err(e) => e.status_code(),
        }
    }
}

/// Fully materialized response: status, headers and body bytes.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Render `response` once and keep the result.
    pub fn capture(response: &dyn Response) -> Result<Self, ResponseError> {
        Ok(Self {
            status: response.status_code(),
            headers: response.headers(),
            body: response.body()?,
        })
    }
}

impl Response for RawResponse {
    fn headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    fn body(&self) -> Result<Bytes, ResponseError> {
        Ok(self.body.clone())
    }

    fn status_code(&self) -> StatusCode {
        self.status
    }
}

/// Wraps a response and sets extra headers on top of its own.
pub struct WithHeaders {
    inner: BoxResponse,
    extra: HeaderMap,
}

impl WithHeaders {
    pub fn new(inner: BoxResponse, extra: HeaderMap) -> Self {
        Self { inner, extra }
    }
}

impl Response for WithHeaders {
    fn headers(&self) -> HeaderMap {
        let mut headers = self.inner.headers();
        for (name, value) in &self.extra {
            headers.insert(name.clone(), value.clone());
        }
        headers
    }

    fn body(&self) -> Result<Bytes, ResponseError> {
        self.inner.body()
    }

    fn status_code(&self) -> StatusCode {
        self.inner.status_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};
    use serde_json::json;

    #[test]
    fn test_result_picks_active_branch() {
        let ok: Result<JsonResponse, ErrorResponse> = Ok(JsonResponse::new(json!({"a": 1})));
        assert_eq!(ok.status_code(), StatusCode::OK);
        assert_eq!(ok.body().unwrap(), Bytes::from_static(br#"{"a":1}"#));

        let err: Result<JsonResponse, ErrorResponse> =
            Err(ErrorResponse::new("nope", StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.body().unwrap(), Bytes::from_static(b"nope"));
        assert_eq!(
            err.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_with_headers_overrides_inner() {
        let mut extra = HeaderMap::new();
        extra.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        extra.insert("x-extra", HeaderValue::from_static("1"));
        let wrapped = WithHeaders::new(HtmlResponse::new("<p>hi</p>").boxed(), extra);
        let headers = wrapped.headers();
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(headers.get("x-extra").unwrap(), "1");
        assert_eq!(wrapped.body().unwrap(), Bytes::from_static(b"<p>hi</p>"));
    }

    #[test]
    fn test_capture_snapshots_response() {
        let raw = RawResponse::capture(&HtmlResponse::new("x").with_status(StatusCode::CREATED))
            .unwrap();
        assert_eq!(raw.status, StatusCode::CREATED);
        assert_eq!(raw.headers.get(header::CONTENT_TYPE).unwrap(), "text/html");
        assert_eq!(raw.body, Bytes::from_static(b"x"));
    }
}
