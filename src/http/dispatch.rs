//! Per-request dispatch and the failure boundary.
//!
//! # Data Flow
//! ```text
//! axum request for a declared path
//!     → path captures + peer address
//!     → body read (size limited, 400 on failure)
//!     → Request context (400 on malformed body)
//!     → validators (422 with the first message)
//!     → compiled middleware chain + action
//!     → status, headers and body copied to the wire
//! ```
//! Everything after routing runs under `catch_unwind`: a panic anywhere in
//! the chain, or a response whose body cannot be rendered, becomes an opaque
//! 500 and a log line.

use std::any::Any;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{ConnectInfo, FromRequestParts, RawPathParams, Request as AxumRequest};
use axum::http::StatusCode;
use axum::response::Response as HttpResponse;
use futures_util::FutureExt;

use crate::app::{Parameter, RegistryError, RouteParts};
use crate::middleware::{compile, AllowedMethods, Handler, Middleware};
use crate::observability::metrics;
use crate::request::{RawRequest, Request, RequestError};
use crate::response::{ErrorResponse, Response, ResponseError};
use crate::validators::validate_and_bind;

/// A frozen route: declared parameters plus its composed handler.
pub(crate) struct CompiledRoute {
    pub path: String,
    parameters: Vec<Parameter>,
    handler: Handler,
    max_body_size: usize,
}

impl CompiledRoute {
    pub fn new(
        parts: RouteParts,
        global: &[Arc<dyn Middleware>],
        max_body_size: usize,
    ) -> Result<Self, RegistryError> {
        let action = parts.action.ok_or_else(|| RegistryError::MissingAction {
            path: parts.path.clone(),
        })?;
        let handler = compile(
            global,
            &parts.middlewares,
            AllowedMethods::new(parts.methods),
            action,
        );
        Ok(Self {
            path: parts.path,
            parameters: parts.parameters,
            handler,
            max_body_size,
        })
    }
}

pub(crate) async fn dispatch(route: Arc<CompiledRoute>, req: AxumRequest) -> HttpResponse {
    let start = Instant::now();
    let method = req.method().clone();

    let response = match AssertUnwindSafe(serve(&route, req)).catch_unwind().await {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => {
            tracing::error!(path = %route.path, error = %err, "Failed to render response");
            internal_error()
        }
        Err(panic) => {
            tracing::error!(
                path = %route.path,
                panic = %panic_message(panic.as_ref()),
                "Request handler panicked"
            );
            internal_error()
        }
    };

    metrics::record_request(
        method.as_str(),
        &route.path,
        response.status().as_u16(),
        start.elapsed(),
    );
    response
}

async fn serve(route: &CompiledRoute, req: AxumRequest) -> Result<HttpResponse, ResponseError> {
    let (mut parts, body) = req.into_parts();

    // 1. Path captures and peer address
    let path_params = match RawPathParams::from_request_parts(&mut parts, &()).await {
        Ok(params) => params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        Err(_) => Vec::new(),
    };
    let remote_addr = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);

    // 2. Body
    let body = match axum::body::to_bytes(body, route.max_body_size).await {
        Ok(bytes) => bytes,
        Err(err) => {
            let err = RequestError::BodyRead(err.to_string());
            tracing::debug!(path = %route.path, error = %err, "Rejected request body");
            return to_http(&ErrorResponse::new("Bad Request", StatusCode::BAD_REQUEST));
        }
    };

    // 3. Request context
    let raw = RawRequest {
        parts,
        path_params,
        body,
        remote_addr,
    };
    let request = match Request::build(raw, &route.parameters) {
        Ok(request) => Arc::new(request),
        Err(err) => {
            tracing::debug!(path = %route.path, error = %err, "Rejected request body");
            return to_http(&ErrorResponse::new(err.to_string(), StatusCode::BAD_REQUEST));
        }
    };

    // 4. Validation
    if let Err(err) = validate_and_bind(&request, &route.parameters) {
        metrics::record_validation_failure(&route.path);
        tracing::debug!(
            path = %route.path,
            parameter = %err.parameter,
            error = %err,
            "Validation failed"
        );
        return to_http(&ErrorResponse::new(
            err.to_string(),
            StatusCode::UNPROCESSABLE_ENTITY,
        ));
    }

    // 5. Middleware chain and action
    let response = (route.handler)(request).await;
    to_http(&*response)
}

fn to_http(response: &dyn Response) -> Result<HttpResponse, ResponseError> {
    let body = response.body()?;
    let mut out = HttpResponse::new(Body::from(body));
    *out.status_mut() = response.status_code();
    out.headers_mut().extend(response.headers());
    Ok(out)
}

fn internal_error() -> HttpResponse {
    let error = ErrorResponse::new("Internal Server Error", StatusCode::INTERNAL_SERVER_ERROR);
    let mut out = HttpResponse::new(Body::from(error.message().to_string()));
    *out.status_mut() = error.status_code();
    out.headers_mut().extend(error.headers());
    out
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
