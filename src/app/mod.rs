//! Route registry.
//!
//! # Responsibilities
//! - Hold application metadata shown in the generated document
//! - Own every declared route, keyed by a unique path
//! - Collect application-wide middleware, security requirements and
//!   included services
//!
//! # Data Flow
//! ```text
//! App::path("/add") → Route builder (methods → description → parameters → action)
//!     ...
//! HttpServer::new(app, config)
//!     → freeze(): completeness + reserved-path checks
//!     → middleware chains compiled, schema projected, axum Router built
//! ```
//!
//! # Design Decisions
//! - Routes live in a `BTreeMap`, so projection order is the path order
//!   regardless of declaration order.
//! - The app is consumed when the server is built; nothing can be declared
//!   after requests start flowing.

mod error;
mod parameter;
mod path;
mod route;

pub use error::RegistryError;
pub use parameter::{ParamLocation, Parameter};
pub use route::{BuildState, Route};
pub(crate) use route::RouteParts;

use path::{check_mount, check_path, conflicts};

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::Request as AxumRequest;
use axum::response::IntoResponse;
use axum::Router;
use tower::Service;

use crate::middleware::Middleware;
use crate::openapi::schema::{Contact, License, SecurityRequirement, SecurityScheme, Tag};
use crate::security::SecurityProvider;

pub const DEFAULT_DOCS_PATH: &str = "/docs";
pub const DEFAULT_SCHEMA_PATH: &str = "/openapi.json";

pub struct App {
    pub(crate) title: String,
    pub(crate) version: String,
    pub(crate) description: String,
    pub(crate) terms_of_service: String,
    pub(crate) license: Option<License>,
    pub(crate) contact: Option<Contact>,
    pub(crate) tags: Vec<Tag>,
    pub(crate) security: Vec<SecurityRequirement>,
    pub(crate) security_schemes: BTreeMap<String, SecurityScheme>,
    pub(crate) middlewares: Vec<Arc<dyn Middleware>>,
    pub(crate) routes: BTreeMap<String, Route>,
    pub(crate) docs_path: String,
    pub(crate) schema_path: String,
    pub(crate) included_paths: Vec<String>,
    pub(crate) included: Router,
}

impl App {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: String::new(),
            terms_of_service: String::new(),
            license: None,
            contact: None,
            tags: Vec::new(),
            security: Vec::new(),
            security_schemes: BTreeMap::new(),
            middlewares: Vec::new(),
            routes: BTreeMap::new(),
            docs_path: DEFAULT_DOCS_PATH.to_string(),
            schema_path: DEFAULT_SCHEMA_PATH.to_string(),
            included_paths: Vec::new(),
            included: Router::new(),
        }
    }

    /// Register a new path and return its builder.
    pub fn path(&mut self, path: &str) -> Result<&mut Route, RegistryError> {
        check_path(path)?;
        if self.routes.contains_key(path) {
            return Err(RegistryError::DuplicatePath(path.to_string()));
        }
        if let Some(existing) = self.routes.keys().find(|p| conflicts(p, path)) {
            return Err(RegistryError::ConflictingPath {
                path: path.to_string(),
                existing: existing.clone(),
            });
        }
        Ok(self
            .routes
            .entry(path.to_string())
            .or_insert_with(|| Route::new(path)))
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    pub fn terms_of_service(&mut self, url: impl Into<String>) -> &mut Self {
        self.terms_of_service = url.into();
        self
    }

    /// `url` may be empty.
    pub fn license(&mut self, name: impl Into<String>, url: impl Into<String>) -> &mut Self {
        self.license = Some(License {
            name: name.into(),
            url: url.into(),
        });
        self
    }

    pub fn contact(
        &mut self,
        name: impl Into<String>,
        url: impl Into<String>,
        email: impl Into<String>,
    ) -> &mut Self {
        self.contact = Some(Contact {
            name: name.into(),
            url: url.into(),
            email: email.into(),
        });
        self
    }

    /// Document a tag. May be called repeatedly; order is kept.
    pub fn tag(&mut self, name: impl Into<String>, description: impl Into<String>) -> &mut Self {
        self.tags.push(Tag {
            name: name.into(),
            description: description.into(),
        });
        self
    }

    /// Require the provider's scheme and register it under `components`.
    pub fn security<P: SecurityProvider + ?Sized>(&mut self, provider: &P) -> &mut Self {
        let mut requirement = SecurityRequirement::new();
        requirement.insert(provider.name().to_string(), provider.scopes());
        self.security.push(requirement);
        if let Some(scheme) = provider.scheme() {
            self.security_schemes.insert(provider.name().to_string(), scheme);
        }
        self
    }

    /// Add an empty requirement, making the declared security optional.
    pub fn optional_security(&mut self) -> &mut Self {
        self.security.push(SecurityRequirement::new());
        self
    }

    /// Application-wide middleware, run after route middleware.
    pub fn middlewares<I>(&mut self, middlewares: I) -> &mut Self
    where
        I: IntoIterator<Item = Arc<dyn Middleware>>,
    {
        self.middlewares.extend(middlewares);
        self
    }

    pub fn middleware<M: Middleware + 'static>(&mut self, middleware: M) -> &mut Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn openapi_docs_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.docs_path = path.into();
        self
    }

    pub fn openapi_schema_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.schema_path = path.into();
        self
    }

    /// Serve an external tower service under `path`, next to the declared
    /// routes. `/` installs it as the fallback for unmatched requests.
    pub fn include<S>(&mut self, path: &str, service: S) -> Result<&mut Self, RegistryError>
    where
        S: Service<AxumRequest, Error = Infallible> + Clone + Send + Sync + 'static,
        S::Response: IntoResponse,
        S::Future: Send + 'static,
    {
        let mount = match path.trim_end_matches('/') {
            "" if path.starts_with('/') => "/",
            trimmed => trimmed,
        };
        check_mount(mount)?;
        if self.included_paths.iter().any(|p| p == mount) {
            return Err(RegistryError::DuplicatePath(mount.to_string()));
        }

        let router = std::mem::take(&mut self.included);
        self.included = if mount == "/" {
            router.fallback_service(service)
        } else {
            router.nest_service(mount, service)
        };
        self.included_paths.push(mount.to_string());
        Ok(self)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn docs_path(&self) -> &str {
        &self.docs_path
    }

    pub fn schema_path(&self) -> &str {
        &self.schema_path
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    /// Check the registry is complete and its paths don't collide.
    ///
    /// `with_docs` reserves the docs and schema paths.
    pub(crate) fn freeze(&self, with_docs: bool) -> Result<(), RegistryError> {
        if with_docs {
            for docs_path in [&self.docs_path, &self.schema_path] {
                check_mount(docs_path)?;
            }
            if self.docs_path == self.schema_path {
                return Err(RegistryError::ReservedPath {
                    path: self.schema_path.clone(),
                });
            }
            if let Some(path) = self
                .included_paths
                .iter()
                .find(|p| **p == self.docs_path || **p == self.schema_path)
            {
                return Err(RegistryError::ReservedPath { path: path.clone() });
            }
        }

        for route in self.routes.values() {
            if route.state() != BuildState::Ready {
                return Err(RegistryError::MissingAction {
                    path: route.path().to_string(),
                });
            }
            let reserved_by_docs =
                with_docs && (route.path() == self.docs_path || route.path() == self.schema_path);
            let reserved_by_include = self.included_paths.iter().any(|p| p == route.path());
            if reserved_by_docs || reserved_by_include {
                return Err(RegistryError::ReservedPath {
                    path: route.path().to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::HtmlResponse;
    use axum::http::Method;

    fn declare(app: &mut App, path: &str) {
        app.path(path)
            .unwrap()
            .methods([Method::GET])
            .unwrap()
            .description("test route")
            .unwrap()
            .action(|_req| async { HtmlResponse::new("ok") })
            .unwrap();
    }

    #[test]
    fn test_duplicate_path_is_rejected() {
        let mut app = App::new("t", "1");
        declare(&mut app, "/ping");
        assert_eq!(
            app.path("/ping").unwrap_err(),
            RegistryError::DuplicatePath("/ping".into())
        );
        assert_eq!(app.routes().count(), 1);
    }

    #[test]
    fn test_invalid_path_is_rejected() {
        let mut app = App::new("t", "1");
        assert_eq!(
            app.path("ping").unwrap_err(),
            RegistryError::InvalidPath {
                path: "ping".into(),
                reason: "must start with '/'",
            }
        );
        assert!(matches!(
            app.path("/v/:id"),
            Err(RegistryError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_captures_differing_only_by_name_conflict() {
        let mut app = App::new("t", "1");
        declare(&mut app, "/u/{id}");
        declare(&mut app, "/u/me");
        assert_eq!(
            app.path("/u/{name}").unwrap_err(),
            RegistryError::ConflictingPath {
                path: "/u/{name}".into(),
                existing: "/u/{id}".into(),
            }
        );
        assert_eq!(app.routes().count(), 2);
    }

    #[test]
    fn test_freeze_requires_action() {
        let mut app = App::new("t", "1");
        declare(&mut app, "/a");
        app.path("/b")
            .unwrap()
            .methods([Method::GET])
            .unwrap()
            .description("no action yet")
            .unwrap();
        assert_eq!(
            app.freeze(true).unwrap_err(),
            RegistryError::MissingAction { path: "/b".into() }
        );
    }

    #[test]
    fn test_docs_paths_are_reserved_only_when_served() {
        let mut app = App::new("t", "1");
        declare(&mut app, "/docs");
        assert_eq!(
            app.freeze(true).unwrap_err(),
            RegistryError::ReservedPath { path: "/docs".into() }
        );
        assert!(app.freeze(false).is_ok());
    }

    #[test]
    fn test_include_reserves_its_path() {
        let mut app = App::new("t", "1");
        declare(&mut app, "/static");
        app.include("/static/", tower::service_fn(|_req: AxumRequest| async {
            Ok::<_, Infallible>("file")
        }))
        .unwrap();
        assert_eq!(
            app.freeze(true).unwrap_err(),
            RegistryError::ReservedPath { path: "/static".into() }
        );
        assert!(matches!(
            app.include("/static", tower::service_fn(|_req: AxumRequest| async {
                Ok::<_, Infallible>("file")
            })),
            Err(RegistryError::DuplicatePath(_))
        ));
    }

    #[test]
    fn test_include_cannot_shadow_docs() {
        let mut app = App::new("t", "1");
        app.include("/openapi.json", tower::service_fn(|_req: AxumRequest| async {
            Ok::<_, Infallible>("mine")
        }))
        .unwrap();
        assert_eq!(
            app.freeze(true).unwrap_err(),
            RegistryError::ReservedPath {
                path: "/openapi.json".into()
            }
        );
        assert!(app.freeze(false).is_ok());
    }

    #[test]
    fn test_security_requirements() {
        use crate::security::ApiKeySecurity;

        let mut app = App::new("t", "1");
        app.security(&ApiKeySecurity::new("x-api-key", "secret"))
            .optional_security();
        assert_eq!(app.security.len(), 2);
        assert_eq!(app.security[0].get("api-key"), Some(&Vec::new()));
        assert!(app.security[1].is_empty());
        assert!(app.security_schemes.contains_key("api-key"));
    }
}
