use std::sync::Arc;

use chrono::Local;

use super::{Handler, Middleware};
use crate::response::Response;

/// Emits one access-log line per request, in the combined log style.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logging;

impl Middleware for Logging {
    fn apply(&self, next: Handler) -> Handler {
        Arc::new(move |req| {
            let next = next.clone();
            Box::pin(async move {
                let response = next(req.clone()).await;

                let scheme = if req.is_tls() { "https" } else { "http" };
                let full_url = format!(
                    "{scheme}://{}{}",
                    req.host().unwrap_or_default(),
                    req.uri()
                );
                let remote = req
                    .remote_addr()
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let size = response.body().map(|b| b.len()).unwrap_or(0);
                let line = format!(
                    "{remote} - - [{}] \"{} {} {:?}\" {} {size} \"{full_url}\" \"{}\"",
                    Local::now().format("%Y-%m-%d %H:%M:%S"),
                    req.method(),
                    req.path(),
                    req.version(),
                    response.status_code().as_u16(),
                    req.user_agent().unwrap_or_default(),
                );
                tracing::info!(target: "openroute::access", "{line}");
                response
            })
        })
    }
}
