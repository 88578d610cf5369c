use std::sync::Arc;
use std::time::Instant;

use super::{Handler, Middleware};

/// Logs how long the rest of the chain took.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timing;

impl Middleware for Timing {
    fn apply(&self, next: Handler) -> Handler {
        Arc::new(move |req| {
            let next = next.clone();
            Box::pin(async move {
                let path = req.path().to_string();
                let start = Instant::now();
                let response = next(req).await;
                tracing::info!(
                    path = %path,
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Request timed"
                );
                response
            })
        })
    }
}
