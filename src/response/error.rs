use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};

use super::{Response, ResponseError};
use crate::request::CoercionError;

/// Plain-text error reply.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    message: String,
    status: StatusCode,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Response for ErrorResponse {
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        headers.insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );
        headers
    }

    fn body(&self) -> Result<Bytes, ResponseError> {
        Ok(Bytes::from(self.message.clone()))
    }

    fn status_code(&self) -> StatusCode {
        self.status
    }
}

impl From<CoercionError> for ErrorResponse {
    fn from(err: CoercionError) -> Self {
        Self::new(err.to_string(), StatusCode::UNPROCESSABLE_ENTITY)
    }
}
