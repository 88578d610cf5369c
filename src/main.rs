//! openroute demo service.
//!
//! Serves a small math API declared with the route builder, its generated
//! OpenAPI document at `/openapi.json` and the Swagger UI at `/docs`.
//!
//! ```text
//! openroute --config openroute.toml --bind 127.0.0.1:8080 --static-dir ./public
//! ```

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use clap::Parser;
use serde_json::json;
use tower_http::services::ServeDir;

use openroute::app::{App, ParamLocation, RegistryError};
use openroute::config::{load_config, ServerConfig};
use openroute::lifecycle::startup::launch;
use openroute::middleware::{Logging, Timeout, Timing};
use openroute::request::Request;
use openroute::response::{ErrorResponse, JsonResponse, RedirectResponse};
use openroute::validators::{IsArray, IsInt, Range, Required, Validator};

#[derive(Debug, Parser)]
#[command(name = "openroute", version, about = "Declarative-route HTTP service demo")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(long)]
    bind: Option<String>,

    /// Serve files from this directory under /static.
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    let app = math_api(cli.static_dir.as_deref())?;
    launch(app, config).await
}

fn operand_validators() -> Vec<Box<dyn Validator>> {
    vec![
        Required.boxed(),
        IsInt.boxed(),
        Range::new(0.0, 100.0).boxed(),
    ]
}

fn math_api(static_dir: Option<&Path>) -> Result<App, RegistryError> {
    let mut app = App::new("math api", "1.0");
    app.description("Math operations with an easy API")
        .contact("openroute", "https://example.com/math", "math@example.com")
        .terms_of_service("https://example.com/math/terms")
        .tag("math", "Arithmetic on query parameters")
        .middleware(Logging)
        .middleware(Timing)
        .middleware(Timeout::new(Duration::from_secs(10)));

    app.path("/")?
        .methods([Method::GET])?
        .description("Redirect to the API docs")?
        .action(|req: Arc<Request>| async move { RedirectResponse::temporary(&req, "/docs") })?;

    app.path("/add")?
        .methods([Method::GET])?
        .description("Add two numbers")?
        .parameter("a", ParamLocation::Query, operand_validators())?
        .parameter("b", ParamLocation::Query, operand_validators())?
        .action(|req: Arc<Request>| async move {
            let (a, b) = (req.get_int("a")?, req.get_int("b")?);
            Ok::<_, ErrorResponse>(JsonResponse::new(json!({ "sum": a + b })))
        })?
        .tags(["math"]);

    app.path("/sub")?
        .methods([Method::GET])?
        .description("Subtract two numbers (a - b)")?
        .parameter("a", ParamLocation::Query, operand_validators())?
        .parameter("b", ParamLocation::Query, operand_validators())?
        .action(|req: Arc<Request>| async move {
            let (a, b) = (req.get_int("a")?, req.get_int("b")?);
            Ok::<_, ErrorResponse>(JsonResponse::new(json!({ "result": a - b })))
        })?
        .tags(["math"]);

    app.path("/mul")?
        .methods([Method::GET, Method::POST])?
        .description("Multiply an array of numbers")?
        .parameter(
            "numbers",
            ParamLocation::Query,
            vec![Required.boxed(), IsArray.boxed()],
        )?
        .action(|req: Arc<Request>| async move {
            let numbers = req.get_int_array("numbers")?;
            let product = numbers
                .iter()
                .try_fold(1i64, |acc, n| acc.checked_mul(*n))
                .ok_or_else(|| {
                    ErrorResponse::new("result overflows", StatusCode::UNPROCESSABLE_ENTITY)
                })?;
            Ok::<_, ErrorResponse>(JsonResponse::new(json!({ "result": product })))
        })?
        .tags(["math", "array"]);

    app.path("/ping")?
        .methods([Method::GET, Method::POST])?
        .description("Echo a validated age")?
        .parameter(
            "age",
            ParamLocation::Query,
            vec![Required.boxed(), IsInt.boxed(), Range::new(5.0, 25.0).boxed()],
        )?
        .action(|req: Arc<Request>| async move {
            let age = req.get_int("age")?;
            Ok::<_, ErrorResponse>(JsonResponse::new(json!({ "age": age })))
        })?;

    if let Some(dir) = static_dir {
        app.include("/static", ServeDir::new(dir))?;
    }

    Ok(app)
}
