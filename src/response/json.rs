use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use serde::Serialize;
use serde_json::Value;

use super::{Response, ResponseError};

/// JSON reply. Conversion errors are kept and reported when the body is read.
#[derive(Debug, Clone)]
pub struct JsonResponse {
    content: Result<Value, String>,
    status: StatusCode,
}

impl JsonResponse {
    pub fn new<T: Serialize>(content: T) -> Self {
        Self {
            content: serde_json::to_value(content).map_err(|e| e.to_string()),
            status: StatusCode::OK,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl Response for JsonResponse {
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers
    }

    fn body(&self) -> Result<Bytes, ResponseError> {
        let value = self.content.as_ref().map_err(|e| ResponseError::Serialize(e.clone()))?;
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|e| ResponseError::Serialize(e.to_string()))
    }

    fn status_code(&self) -> StatusCode {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_unserializable_content_fails_on_body() {
        let mut content = HashMap::new();
        content.insert((1, 2), "tuple keys are not valid JSON keys");
        let response = JsonResponse::new(content);
        assert!(matches!(response.body(), Err(ResponseError::Serialize(_))));
    }

    #[test]
    fn test_status_override() {
        let response = JsonResponse::new(serde_json::json!({})).with_status(StatusCode::CREATED);
        assert_eq!(response.status_code(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }
}
