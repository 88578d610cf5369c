//! Fixed-window rate limiting per client IP.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::http::StatusCode;

use super::{Handler, Middleware};
use crate::request::Request;
use crate::response::{HtmlResponse, Response};

/// Requests seen from one client in the current window.
struct Window {
    started: Instant,
    count: u32,
}

/// Per-client windows plus the time expired ones were last dropped.
struct Windows {
    clients: HashMap<String, Window>,
    last_sweep: Instant,
}

struct LimiterState {
    max_requests: u32,
    interval: Duration,
    windows: Mutex<Windows>,
}

impl LimiterState {
    /// Count the request and report whether it is within the limit.
    fn check(&self, client: String) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        // At most once per interval, forget clients whose window has ended.
        if now.duration_since(windows.last_sweep) > self.interval {
            let interval = self.interval;
            windows
                .clients
                .retain(|_, w| now.duration_since(w.started) <= interval);
            windows.last_sweep = now;
        }

        let window = windows.clients.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(window.started) > self.interval {
            window.started = now;
            window.count = 0;
        }
        window.count = window.count.saturating_add(1);
        window.count <= self.max_requests
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clients
            .len()
    }
}

/// Allows `max_requests` per client IP within each `interval`, answering 429
/// beyond that. Requests with no known peer address share one window.
#[derive(Clone)]
pub struct RateLimiter {
    state: Arc<LimiterState>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, interval: Duration) -> Self {
        Self {
            state: Arc::new(LimiterState {
                max_requests,
                interval,
                windows: Mutex::new(Windows {
                    clients: HashMap::new(),
                    last_sweep: Instant::now(),
                }),
            }),
        }
    }
}

fn client_key(req: &Request) -> String {
    req.remote_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

impl Middleware for RateLimiter {
    fn apply(&self, next: Handler) -> Handler {
        let state = self.state.clone();
        Arc::new(move |req| {
            let client = client_key(&req);
            if state.check(client.clone()) {
                return next(req);
            }
            Box::pin(async move {
                metrics::counter!("openroute_rate_limited_total", "reason" => "client_ip")
                    .increment(1);
                tracing::warn!(client = %client, "Rate limit exceeded");
                HtmlResponse::new("Rate limit exceeded")
                    .with_status(StatusCode::TOO_MANY_REQUESTS)
                    .boxed()
            })
        })
    }
}
