//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TcpListener
//!     → server.rs (axum Router: declared routes, docs, included services,
//!       request-id and trace layers)
//!     → dispatch.rs (context, validation, compiled chain, failure boundary)
//! ```
//!
//! # Design Decisions
//! - Routing and connection handling are axum's; this layer only adapts
//!   between axum requests and the declared routes.
//! - All per-route work that can be done once (chain composition, schema
//!   serialization) happens in `HttpServer::new`.

mod dispatch;
pub mod server;

pub use server::HttpServer;
