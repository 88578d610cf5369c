use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};

use super::{Response, ResponseError};

#[derive(Debug, Clone)]
pub struct HtmlResponse {
    content: String,
    status: StatusCode,
}

impl HtmlResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            status: StatusCode::OK,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl Response for HtmlResponse {
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
        headers
    }

    fn body(&self) -> Result<Bytes, ResponseError> {
        Ok(Bytes::from(self.content.clone()))
    }

    fn status_code(&self) -> StatusCode {
        self.status
    }
}
