use std::sync::Arc;

use axum::http::{Method, StatusCode};

use super::{Handler, Middleware};
use crate::response::{ErrorResponse, Response};

/// Innermost layer of every route: rejects methods the route didn't declare.
#[derive(Debug, Clone)]
pub struct AllowedMethods {
    methods: Arc<[Method]>,
}

impl AllowedMethods {
    pub fn new(methods: Vec<Method>) -> Self {
        Self {
            methods: methods.into(),
        }
    }
}

impl Middleware for AllowedMethods {
    fn apply(&self, next: Handler) -> Handler {
        let methods = self.methods.clone();
        Arc::new(move |req| {
            if methods.contains(req.method()) {
                next(req)
            } else {
                Box::pin(async {
                    ErrorResponse::new("Method Not Allowed", StatusCode::METHOD_NOT_ALLOWED).boxed()
                })
            }
        })
    }
}
