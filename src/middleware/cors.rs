use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};

use super::{Handler, Middleware};
use crate::request::Request;
use crate::response::{ErrorResponse, HtmlResponse, Response, WithHeaders};

/// Answers preflight requests and decorates every other response with the
/// `Access-Control-Allow-*` headers.
#[derive(Debug, Clone)]
pub struct Cors {
    config: Arc<CorsConfig>,
}

#[derive(Debug)]
struct CorsConfig {
    origins: Vec<String>,
    methods: String,
    headers: String,
}

impl Cors {
    /// `"*"` in `origins` allows any origin.
    pub fn new<O, M, H>(origins: O, methods: M, headers: H) -> Self
    where
        O: IntoIterator,
        O::Item: Into<String>,
        M: IntoIterator<Item = Method>,
        H: IntoIterator,
        H::Item: Into<String>,
    {
        let methods: Vec<String> = methods.into_iter().map(|m| m.to_string()).collect();
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        Self {
            config: Arc::new(CorsConfig {
                origins: origins.into_iter().map(Into::into).collect(),
                methods: methods.join(", "),
                headers: headers.join(", "),
            }),
        }
    }
}

impl CorsConfig {
    fn origin_allowed(&self, origin: &str) -> bool {
        self.origins.iter().any(|o| o == "*" || o == origin)
    }

    fn allow_headers(&self, req: &Request) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let origin = req.header(header::ORIGIN.as_str()).unwrap_or_default();
        for (name, value) in [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, origin),
            (header::ACCESS_CONTROL_ALLOW_METHODS, self.methods.as_str()),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, self.headers.as_str()),
        ] {
            if let Ok(value) = HeaderValue::from_str(value) {
                headers.insert(name, value);
            }
        }
        headers
    }
}

impl Middleware for Cors {
    fn apply(&self, next: Handler) -> Handler {
        let config = self.config.clone();
        Arc::new(move |req| {
            let next = next.clone();
            let config = config.clone();
            Box::pin(async move {
                let extra = config.allow_headers(&req);
                if req.method() == Method::OPTIONS {
                    let origin = req.header(header::ORIGIN.as_str()).unwrap_or_default();
                    if !config.origin_allowed(origin) {
                        return ErrorResponse::new("Forbidden", StatusCode::FORBIDDEN).boxed();
                    }
                    return WithHeaders::new(HtmlResponse::new("").boxed(), extra).boxed();
                }
                let response = next(req).await;
                WithHeaders::new(response, extra).boxed()
            })
        })
    }
}
