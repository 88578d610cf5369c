//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize logging and metrics from configuration
//! - Freeze the app into a server
//! - Bind the listener and serve until a shutdown signal

use std::error::Error;
use std::net::SocketAddr;

use tokio::net::TcpListener;

use super::{signals, Shutdown};
use crate::app::App;
use crate::config::ServerConfig;
use crate::http::HttpServer;
use crate::observability::{logging, metrics};

/// Run `app` with `config` until Ctrl+C / SIGTERM.
pub async fn launch(app: App, config: ServerConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    logging::init_tracing(&config.observability);

    if config.observability.metrics_enabled {
        let address: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::install_exporter(address)?;
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(app, config)?;

    let listener = TcpListener::bind(&bind_address).await?;

    let shutdown = Shutdown::new();
    tokio::spawn(signals::wait_for_signal(shutdown.clone()));

    server.run(listener, shutdown.subscribe()).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}
