//! In-memory response cache.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use dashmap::DashMap;

use super::{Handler, Middleware};
use crate::response::{RawResponse, Response};

struct Entry {
    response: RawResponse,
    expires_at: Instant,
}

/// Caches `200 OK` responses keyed by `prefix + URI` for `ttl`.
///
/// Responses whose body cannot be rendered are passed through uncached.
#[derive(Clone)]
pub struct Cache {
    prefix: Arc<str>,
    ttl: Duration,
    entries: Arc<DashMap<String, Entry>>,
}

impl Cache {
    pub fn new(ttl: Duration, prefix: impl Into<String>) -> Self {
        Self {
            prefix: Arc::from(prefix.into()),
            ttl,
            entries: Arc::new(DashMap::new()),
        }
    }

    fn lookup(&self, key: &str) -> Option<RawResponse> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > now {
                return Some(entry.response.clone());
            }
        }
        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        None
    }

    fn store(&self, key: String, response: RawResponse) {
        self.entries.insert(
            key,
            Entry {
                response,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }
}

impl Middleware for Cache {
    fn apply(&self, next: Handler) -> Handler {
        let cache = self.clone();
        Arc::new(move |req| {
            let next = next.clone();
            let cache = cache.clone();
            Box::pin(async move {
                let key = format!("{}{} {}", cache.prefix, req.method(), req.uri());
                if let Some(hit) = cache.lookup(&key) {
                    tracing::debug!(key = %key, "Cache hit");
                    return hit.boxed();
                }

                let response = next(req).await;
                if response.status_code() != StatusCode::OK {
                    return response;
                }
                match RawResponse::capture(&*response) {
                    Ok(raw) => {
                        cache.store(key, raw.clone());
                        raw.boxed()
                    }
                    Err(_) => response,
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::handler_fn;
    use crate::request::Request;
    use crate::response::{ErrorResponse, JsonResponse};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn empty_request() -> Arc<Request> {
        Arc::new(Request::from_parameters(Vec::<(String, serde_json::Value)>::new()))
    }

    #[tokio::test]
    async fn test_second_request_is_served_from_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let action = handler_fn(move |_req| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move { JsonResponse::new(serde_json::json!({ "call": n })) }
        });
        let handler = Cache::new(Duration::from_secs(60), "t:").apply(action);

        let first = handler(empty_request()).await.body().unwrap();
        let second = handler(empty_request()).await.body().unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_ok_responses_are_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let action = handler_fn(move |_req| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { ErrorResponse::new("boom", StatusCode::BAD_GATEWAY) }
        });
        let handler = Cache::new(Duration::from_secs(60), "t:").apply(action);

        handler(empty_request()).await;
        handler(empty_request()).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = Cache::new(Duration::from_millis(10), "");
        cache.store(
            "k".into(),
            RawResponse::new(StatusCode::OK, Default::default(), "v"),
        );
        assert!(cache.lookup("k").is_some());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(cache.lookup("k").is_none());
    }
}
