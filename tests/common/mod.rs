//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use openroute::app::{App, ParamLocation};
use openroute::config::ServerConfig;
use openroute::http::HttpServer;
use openroute::lifecycle::Shutdown;
use openroute::request::Request;
use openroute::response::{ErrorResponse, JsonResponse};
use openroute::validators::{IsInt, Range, Required, Validator};
use serde_json::json;
use tokio::net::TcpListener;

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Freeze `app`, bind it to `127.0.0.1:0` and serve it in the background.
pub async fn spawn_server(app: App, config: ServerConfig) -> TestServer {
    let server = HttpServer::new(app, config).expect("app should freeze");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestServer {
        addr,
        client,
        shutdown,
    }
}

/// App with the `/ping` route: `age` must be an integer in 5..=25.
pub fn ping_app() -> App {
    let mut app = App::new("ping", "1.0");
    app.path("/ping")
        .unwrap()
        .methods([Method::GET, Method::POST])
        .unwrap()
        .description("Echo a validated age")
        .unwrap()
        .parameter(
            "age",
            ParamLocation::Query,
            vec![Required.boxed(), IsInt.boxed(), Range::new(5.0, 25.0).boxed()],
        )
        .unwrap()
        .action(|req: Arc<Request>| async move {
            let age = req.get_int("age")?;
            Ok::<_, ErrorResponse>(JsonResponse::new(json!({ "age": age })))
        })
        .unwrap();
    app
}
