//! Parameter validators.
//!
//! # Responsibilities
//! - Check one named value of a [`Request`] against a rule
//! - Describe the rule into the parameter's OpenAPI schema fragment
//! - Run a route's parameter chains in declaration order
//!
//! # Design Decisions
//! - Pure type validators accept an absent value; presence is the job of
//!   [`Required`]. Every other validator needs a value and reports the
//!   `is required` message when it is missing.
//! - Type checks go through [`crate::request::coerce`], the same functions
//!   the request accessors use, so a value that validates always reads.

mod bounds;
mod formats;
mod password;
mod required;
mod types;

pub use bounds::{Range, StringLength};
pub use formats::{Date, Email, IpAddress, MatchesRegex, PhoneNumber, Time, Url, Uuid};
pub use password::Password;
pub use required::Required;
pub use types::{IsArray, IsBool, IsFloat, IsInt, IsMap, IsString};

use std::fmt;

use thiserror::Error;

use crate::app::Parameter;
use crate::openapi::SchemaObject;
use crate::request::coerce::{self, Kind};
use crate::request::Request;

/// A failed check, carrying the message sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// First failure of a route's parameter chains.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source}")]
pub struct ParameterError {
    pub parameter: String,
    #[source]
    pub source: ValidationError,
}

pub trait Validator: Send + Sync + fmt::Debug {
    fn validate(&self, req: &Request, name: &str) -> Result<(), ValidationError>;

    /// Contribute to the parameter's schema. Most validators add a type or
    /// format; some add nothing.
    fn describe(&self, _schema: &mut SchemaObject) {}

    /// Whether this validator makes the parameter mandatory in the schema.
    fn is_required(&self) -> bool {
        false
    }

    fn boxed(self) -> Box<dyn Validator>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

/// Run every parameter's chain; the first failure wins.
pub fn validate_and_bind(req: &Request, parameters: &[Parameter]) -> Result<(), ParameterError> {
    for param in parameters {
        for validator in &param.validators {
            validator
                .validate(req, &param.name)
                .map_err(|source| ParameterError {
                    parameter: param.name.clone(),
                    source,
                })?;
        }
    }
    Ok(())
}

pub(crate) fn required_error(name: &str) -> ValidationError {
    ValidationError::new(format!("parameter {name} is required"))
}

pub(crate) fn type_error(name: &str, kind: Kind) -> ValidationError {
    ValidationError::new(format!(
        "parameter {name} must be of type '{}'",
        kind.label()
    ))
}

/// Check the value only when present.
pub(crate) fn check_type(req: &Request, name: &str, kind: Kind) -> Result<(), ValidationError> {
    match req.get(name) {
        Some(value) => coerce::check(name, value, kind).map_err(|_| type_error(name, kind)),
        None => Ok(()),
    }
}

pub(crate) fn require_string(req: &Request, name: &str) -> Result<String, ValidationError> {
    let value = req.get(name).ok_or_else(|| required_error(name))?;
    coerce::to_string(name, value).map_err(|_| type_error(name, Kind::String))
}

pub(crate) fn require_float(req: &Request, name: &str) -> Result<f64, ValidationError> {
    let value = req.get(name).ok_or_else(|| required_error(name))?;
    coerce::to_float(name, value).map_err(|_| type_error(name, Kind::Float))
}
