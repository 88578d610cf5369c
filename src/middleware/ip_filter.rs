use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;

use axum::http::StatusCode;

use super::{Handler, Middleware};
use crate::response::{HtmlResponse, Response};

/// Only lets listed client IPs through; everyone else gets 403.
#[derive(Debug, Clone)]
pub struct IpFilter {
    allowed: Arc<HashSet<IpAddr>>,
}

impl IpFilter {
    pub fn new<I: IntoIterator<Item = IpAddr>>(allowed: I) -> Self {
        Self {
            allowed: Arc::new(allowed.into_iter().collect()),
        }
    }
}

impl Middleware for IpFilter {
    fn apply(&self, next: Handler) -> Handler {
        let allowed = self.allowed.clone();
        Arc::new(move |req| {
            let permitted = req
                .remote_addr()
                .is_some_and(|addr| allowed.contains(&addr.ip()));
            if permitted {
                return next(req);
            }
            Box::pin(async {
                HtmlResponse::new("Access denied")
                    .with_status(StatusCode::FORBIDDEN)
                    .boxed()
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::handler_fn;
    use crate::request::Request;

    #[tokio::test]
    async fn test_unknown_peer_is_denied() {
        let filter = IpFilter::new(["127.0.0.1".parse().unwrap()]);
        let handler = filter.apply(handler_fn(|_req| async { HtmlResponse::new("ok") }));
        let req = Arc::new(Request::from_parameters(Vec::<(String, serde_json::Value)>::new()));
        let response = handler(req).await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(&response.body().unwrap()[..], b"Access denied");
    }
}
