//! HTTP server setup.
//!
//! # Responsibilities
//! - Freeze the declared app: completeness checks, chain composition
//! - Project and serialize the OpenAPI document once
//! - Build the axum Router: declared routes, docs, included services
//! - Wire up middleware (tracing, request ID)
//! - Serve with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::Request as AxumRequest;
use axum::http::header;
use axum::routing::{any, get};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::dispatch::{dispatch, CompiledRoute};
use crate::app::{App, RegistryError};
use crate::config::ServerConfig;
use crate::observability::spans::make_request_span;
use crate::openapi::{docs, render_document};

/// HTTP server for a frozen [`App`].
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    docs_path: Option<String>,
}

impl HttpServer {
    /// Freeze `app` and build the router. Fails on incomplete routes or
    /// path collisions; nothing is bound yet.
    pub fn new(mut app: App, config: ServerConfig) -> Result<Self, RegistryError> {
        if let Some(path) = &config.docs.docs_path {
            app.openapi_docs_path(path.clone());
        }
        if let Some(path) = &config.docs.schema_path {
            app.openapi_schema_path(path.clone());
        }
        app.freeze(config.docs.enabled)?;

        let mut router = Router::new();

        let docs_path = if config.docs.enabled {
            let schema: Bytes = render_document(&app)
                .map_err(|e| RegistryError::SchemaSerialization(e.to_string()))?;
            let page = docs::swagger_html(app.title(), app.schema_path());

            router = router
                .route(
                    app.schema_path(),
                    get(move || {
                        let schema = schema.clone();
                        async move { ([(header::CONTENT_TYPE, "application/json")], schema) }
                    }),
                )
                .route(
                    app.docs_path(),
                    get(move || {
                        let page = page.clone();
                        async move { ([(header::CONTENT_TYPE, "text/html")], page) }
                    }),
                );
            Some(app.docs_path().to_string())
        } else {
            None
        };

        let routes = std::mem::take(&mut app.routes);
        for (path, route) in routes {
            let compiled = Arc::new(CompiledRoute::new(
                route.into_parts(),
                &app.middlewares,
                config.limits.max_body_size,
            )?);
            router = router.route(
                &path,
                any(move |req: AxumRequest| dispatch(compiled.clone(), req)),
            );
            tracing::debug!(path = %path, "Route registered");
        }

        let router = router
            .merge(app.included)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        Ok(Self {
            router,
            config,
            docs_path,
        })
    }

    /// The fully layered router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight
    /// requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            docs = self.docs_path.as_deref().unwrap_or("disabled"),
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
