//! Route declaration builder.
//!
//! Calls must follow `methods → description → parameter* → action`.
//! `tags`, `deprecated` and `middlewares` may be called at any point.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::http::Method;

use super::{ParamLocation, Parameter, RegistryError};
use crate::middleware::{handler_fn, Handler, Middleware};
use crate::request::Request;
use crate::response::Response;
use crate::validators::Validator;

/// How far a route's declaration has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BuildState {
    Empty,
    MethodsSet,
    DescriptionSet,
    Ready,
}

pub struct Route {
    path: String,
    state: BuildState,
    methods: Vec<Method>,
    description: String,
    tags: Vec<String>,
    deprecated: bool,
    parameters: Vec<Parameter>,
    middlewares: Vec<Arc<dyn Middleware>>,
    action: Option<Handler>,
}

impl Route {
    pub(crate) fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state: BuildState::Empty,
            methods: Vec::new(),
            description: String::new(),
            tags: Vec::new(),
            deprecated: false,
            parameters: Vec::new(),
            middlewares: Vec::new(),
            action: None,
        }
    }

    fn require(&self, needed: BuildState, call: &'static str) -> Result<(), RegistryError> {
        if self.state >= needed {
            return Ok(());
        }
        let requires = match needed {
            BuildState::MethodsSet => "methods",
            _ => "description",
        };
        Err(RegistryError::OutOfOrder {
            path: self.path.clone(),
            call,
            requires,
        })
    }

    fn advance(&mut self, to: BuildState) {
        self.state = self.state.max(to);
    }

    /// Add allowed methods. May be called again to allow more.
    pub fn methods<I>(&mut self, methods: I) -> Result<&mut Self, RegistryError>
    where
        I: IntoIterator<Item = Method>,
    {
        let mut any = false;
        for method in methods {
            any = true;
            if !self.methods.contains(&method) {
                self.methods.push(method);
            }
        }
        if !any {
            return Err(RegistryError::EmptyMethods {
                path: self.path.clone(),
            });
        }
        self.advance(BuildState::MethodsSet);
        Ok(self)
    }

    pub fn description(&mut self, description: impl Into<String>) -> Result<&mut Self, RegistryError> {
        self.require(BuildState::MethodsSet, "description")?;
        let description = description.into();
        if description.trim().is_empty() {
            return Err(RegistryError::EmptyDescription {
                path: self.path.clone(),
            });
        }
        self.description = description;
        self.advance(BuildState::DescriptionSet);
        Ok(self)
    }

    /// Declare a parameter. Re-declaring a name replaces it in place.
    pub fn parameter(
        &mut self,
        name: impl Into<String>,
        location: ParamLocation,
        validators: Vec<Box<dyn Validator>>,
    ) -> Result<&mut Self, RegistryError> {
        self.require(BuildState::DescriptionSet, "parameter")?;
        let param = Parameter::new(name, location, validators);
        match self.parameters.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => *existing = param,
            None => self.parameters.push(param),
        }
        Ok(self)
    }

    /// Set the action run once validation passes. A later call replaces it.
    pub fn action<F, Fut, R>(&mut self, action: F) -> Result<&mut Self, RegistryError>
    where
        F: Fn(Arc<Request>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: Response,
    {
        self.require(BuildState::DescriptionSet, "action")?;
        self.action = Some(handler_fn(action));
        self.advance(BuildState::Ready);
        Ok(self)
    }

    pub fn tags<I, S>(&mut self, tags: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn deprecated(&mut self) -> &mut Self {
        self.deprecated = true;
        self
    }

    /// Route-level middleware, run before the application-wide ones.
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

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn allowed_methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn description_text(&self) -> &str {
        &self.description
    }

    pub fn tag_list(&self) -> &[String] {
        &self.tags
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    #[cfg(test)]
    pub(crate) fn handler(&self) -> Option<&Handler> {
        self.action.as_ref()
    }

    /// Split a finished declaration into what dispatch needs.
    pub(crate) fn into_parts(self) -> RouteParts {
        RouteParts {
            path: self.path,
            methods: self.methods,
            parameters: self.parameters,
            middlewares: self.middlewares,
            action: self.action,
        }
    }
}

pub(crate) struct RouteParts {
    pub path: String,
    pub methods: Vec<Method>,
    pub parameters: Vec<Parameter>,
    pub middlewares: Vec<Arc<dyn Middleware>>,
    pub action: Option<Handler>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("state", &self.state)
            .field("methods", &self.methods)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}
