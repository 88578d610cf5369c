use std::sync::Arc;

use axum::http::StatusCode;

use super::SecurityProvider;
use crate::middleware::{Handler, Middleware};
use crate::response::{ErrorResponse, Response};

/// Rejects requests the provider does not authenticate with 401.
#[derive(Clone)]
pub struct RequireAuth {
    provider: Arc<dyn SecurityProvider>,
}

impl RequireAuth {
    pub fn new(provider: Arc<dyn SecurityProvider>) -> Self {
        Self { provider }
    }
}

impl Middleware for RequireAuth {
    fn apply(&self, next: Handler) -> Handler {
        let provider = self.provider.clone();
        Arc::new(move |req| {
            if provider.is_authenticated(&req) {
                return next(req);
            }
            tracing::debug!(
                path = %req.path(),
                scheme = %provider.name(),
                "Unauthenticated request rejected"
            );
            Box::pin(async {
                ErrorResponse::new("Unauthorized", StatusCode::UNAUTHORIZED).boxed()
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::handler_fn;
    use crate::request::Request;
    use crate::response::HtmlResponse;
    use crate::security::ApiKeySecurity;
    use serde_json::json;

    #[tokio::test]
    async fn test_rejects_missing_key() {
        let guard = RequireAuth::new(Arc::new(ApiKeySecurity::new("x-api-key", "k")));
        let handler = guard.apply(handler_fn(|_req| async { HtmlResponse::new("in") }));

        let denied = handler(Arc::new(Request::from_parameters(
            Vec::<(String, serde_json::Value)>::new(),
        )))
        .await;
        assert_eq!(denied.status_code(), StatusCode::UNAUTHORIZED);

        let allowed = handler(Arc::new(Request::from_parameters([("x-api-key", json!("k"))]))).await;
        assert_eq!(allowed.status_code(), StatusCode::OK);
    }
}
