//! Declarative-route HTTP service layer.
//!
//! Routes are declared once with their methods, description, validated
//! parameters and action. The same declarations drive request dispatch and
//! the generated OpenAPI document.

pub mod app;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod middleware;
pub mod observability;
pub mod openapi;
pub mod request;
pub mod response;
pub mod security;
pub mod validators;

pub use app::{App, ParamLocation, Parameter, RegistryError, Route};
pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use request::{CoercionError, Request};
pub use response::{
    BoxResponse, ErrorResponse, HtmlResponse, JsonResponse, RedirectResponse, Response,
    TemplateResponse,
};
