//! Middleware composition.
//!
//! # Data Flow
//! ```text
//! request → route middleware (declaration order)
//!         → application middleware (declaration order)
//!         → method allow-list (405 on mismatch)
//!         → action
//! ```
//!
//! # Design Decisions
//! - A middleware is a function from the next handler to a new handler;
//!   chains are composed once per route when the server is built.
//! - Short-circuiting is just returning without calling `next`.
//! - Stateful middleware (rate limiter, cache) own their state behind
//!   interior mutability, since the same instance serves every request.

mod cache;
mod cors;
mod ip_filter;
mod logging;
mod methods;
mod rate_limit;
mod timeout;
mod timing;

pub use cache::Cache;
pub use cors::Cors;
pub use ip_filter::IpFilter;
pub use logging::Logging;
pub use methods::AllowedMethods;
pub use rate_limit::RateLimiter;
pub use timeout::Timeout;
pub use timing::Timing;

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::request::Request;
use crate::response::{BoxResponse, Response};

/// A compiled request handler.
pub type Handler = Arc<dyn Fn(Arc<Request>) -> BoxFuture<'static, BoxResponse> + Send + Sync>;

pub trait Middleware: Send + Sync {
    /// Wrap `next`, returning the handler that runs in its place.
    fn apply(&self, next: Handler) -> Handler;
}

/// Adapt an async function into a [`Handler`].
pub fn handler_fn<F, Fut, R>(f: F) -> Handler
where
    F: Fn(Arc<Request>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: Response,
{
    Arc::new(move |req| {
        let fut = f(req);
        Box::pin(async move { fut.await.boxed() })
    })
}

/// Compose a route's full chain.
pub fn compile(
    global: &[Arc<dyn Middleware>],
    route: &[Arc<dyn Middleware>],
    methods: AllowedMethods,
    action: Handler,
) -> Handler {
    let mut handler = methods.apply(action);
    for mw in global.iter().rev() {
        handler = mw.apply(handler);
    }
    for mw in route.iter().rev() {
        handler = mw.apply(handler);
    }
    handler
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::HtmlResponse;
    use axum::http::{Method, StatusCode};
    use std::sync::Mutex;

    /// Records its label before and after calling the next handler.
    struct Probe {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Middleware for Probe {
        fn apply(&self, next: Handler) -> Handler {
            let label = self.label;
            let log = self.log.clone();
            Arc::new(move |req| {
                let next = next.clone();
                let log = log.clone();
                Box::pin(async move {
                    log.lock().unwrap().push(format!("{label}:in"));
                    let response = next(req).await;
                    log.lock().unwrap().push(format!("{label}:out"));
                    response
                })
            })
        }
    }

    #[tokio::test]
    async fn test_route_middleware_runs_before_global() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let probe = |label| -> Arc<dyn Middleware> {
            Arc::new(Probe {
                label,
                log: log.clone(),
            })
        };

        let action_log = log.clone();
        let action = handler_fn(move |_req| {
            let log = action_log.clone();
            async move {
                log.lock().unwrap().push("action".to_string());
                HtmlResponse::new("done")
            }
        });

        let handler = compile(
            &[probe("A"), probe("B")],
            &[probe("X")],
            AllowedMethods::new(vec![Method::GET]),
            action,
        );
        let response = handler(Arc::new(Request::from_parameters(
            Vec::<(String, serde_json::Value)>::new(),
        )))
        .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["X:in", "A:in", "B:in", "action", "B:out", "A:out", "X:out"]
        );
    }

    #[tokio::test]
    async fn test_disallowed_method_still_runs_middleware() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let probe = |label| -> Arc<dyn Middleware> {
            Arc::new(Probe {
                label,
                log: log.clone(),
            })
        };

        let action_log = log.clone();
        let action = handler_fn(move |_req| {
            let log = action_log.clone();
            async move {
                log.lock().unwrap().push("action".to_string());
                HtmlResponse::new("done")
            }
        });

        let handler = compile(
            &[probe("A")],
            &[probe("X")],
            AllowedMethods::new(vec![Method::GET]),
            action,
        );

        let (parts, _) = axum::http::Request::builder()
            .method(Method::DELETE)
            .uri("/x")
            .body(())
            .unwrap()
            .into_parts();
        let raw = crate::request::RawRequest {
            parts,
            path_params: Vec::new(),
            body: axum::body::Bytes::new(),
            remote_addr: None,
        };
        let response = handler(Arc::new(Request::build(raw, &[]).unwrap())).await;

        assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["X:in", "A:in", "A:out", "X:out"]
        );
    }
}
