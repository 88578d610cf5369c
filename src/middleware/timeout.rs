use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;

use super::{Handler, Middleware};
use crate::response::{HtmlResponse, Response};

/// Answers 504 when the rest of the chain takes longer than the deadline.
///
/// The inner chain runs on its own task. On expiry the client gets its
/// answer immediately and the task is left to finish on its own; its result
/// is discarded.
#[derive(Debug, Clone, Copy)]
pub struct Timeout {
    duration: Duration,
}

impl Timeout {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl Middleware for Timeout {
    fn apply(&self, next: Handler) -> Handler {
        let duration = self.duration;
        Arc::new(move |req| {
            let next = next.clone();
            Box::pin(async move {
                let path = req.path().to_string();
                let task = tokio::spawn(next(req));
                match tokio::time::timeout(duration, task).await {
                    Ok(Ok(response)) => response,
                    // Re-raise so the dispatch boundary reports it like any panic.
                    Ok(Err(join_err)) => match join_err.try_into_panic() {
                        Ok(payload) => std::panic::resume_unwind(payload),
                        Err(_) => HtmlResponse::new("Request cancelled")
                            .with_status(StatusCode::SERVICE_UNAVAILABLE)
                            .boxed(),
                    },
                    Err(_) => {
                        tracing::warn!(
                            path = %path,
                            timeout_ms = duration.as_millis() as u64,
                            "Request timed out"
                        );
                        HtmlResponse::new("Request timed out")
                            .with_status(StatusCode::GATEWAY_TIMEOUT)
                            .boxed()
                    }
                }
            })
        })
    }
}
