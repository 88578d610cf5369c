//! String format validators.

use std::net::IpAddr;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use super::{require_string, ValidationError, Validator};
use crate::openapi::SchemaObject;
use crate::request::Request;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern is valid")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl Validator for Email {
    fn validate(&self, req: &Request, name: &str) -> Result<(), ValidationError> {
        let value = require_string(req, name)?;
        if !EMAIL.is_match(&value) {
            return Err(ValidationError::new(format!(
                "parameter {name} must be a valid email address"
            )));
        }
        Ok(())
    }

    fn describe(&self, schema: &mut SchemaObject) {
        schema.set_format("email");
    }
}

/// Absolute URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct Url;

impl Validator for Url {
    fn validate(&self, req: &Request, name: &str) -> Result<(), ValidationError> {
        let value = require_string(req, name)?;
        url::Url::parse(&value).map(drop).map_err(|e| {
            ValidationError::new(format!("parameter {name} must be a valid URL: {e}"))
        })
    }

    fn describe(&self, schema: &mut SchemaObject) {
        schema.set_format("url");
    }
}

/// Hyphenated RFC 4122 UUID of version 1 through 5.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uuid;

impl Validator for Uuid {
    fn validate(&self, req: &Request, name: &str) -> Result<(), ValidationError> {
        let value = require_string(req, name)?;
        let valid = value.len() == 36
            && uuid::Uuid::parse_str(&value).is_ok_and(|id| {
                (1..=5).contains(&id.get_version_num()) && id.get_variant() == uuid::Variant::RFC4122
            });
        if !valid {
            return Err(ValidationError::new(format!(
                "parameter {name} must be a valid UUID"
            )));
        }
        Ok(())
    }

    fn describe(&self, schema: &mut SchemaObject) {
        schema.set_format("uuid");
    }
}

/// Calendar date in a `strftime` format such as `%Y-%m-%d`.
#[derive(Debug, Clone)]
pub struct Date {
    pub format: String,
}

impl Date {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl Validator for Date {
    fn validate(&self, req: &Request, name: &str) -> Result<(), ValidationError> {
        let value = require_string(req, name)?;
        NaiveDate::parse_from_str(&value, &self.format)
            .map(drop)
            .map_err(|_| {
                ValidationError::new(format!(
                    "parameter {name} must be a valid date in the format {}",
                    self.format
                ))
            })
    }

    fn describe(&self, schema: &mut SchemaObject) {
        schema.set_format("date");
    }
}

/// Time of day in a `strftime` format such as `%H:%M:%S`.
#[derive(Debug, Clone)]
pub struct Time {
    pub format: String,
}

impl Time {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl Validator for Time {
    fn validate(&self, req: &Request, name: &str) -> Result<(), ValidationError> {
        let value = require_string(req, name)?;
        NaiveTime::parse_from_str(&value, &self.format)
            .map(drop)
            .map_err(|_| {
                ValidationError::new(format!(
                    "parameter {name} must be a valid time in the format {}",
                    self.format
                ))
            })
    }

    fn describe(&self, schema: &mut SchemaObject) {
        schema.set_format("time");
    }
}

/// String matching a regular expression anywhere unless anchored.
#[derive(Debug, Clone)]
pub struct MatchesRegex {
    pattern: Regex,
}

impl MatchesRegex {
    /// Compiled once here rather than per request.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl Validator for MatchesRegex {
    fn validate(&self, req: &Request, name: &str) -> Result<(), ValidationError> {
        let value = require_string(req, name)?;
        if !self.pattern.is_match(&value) {
            return Err(ValidationError::new(format!(
                "parameter {name} must match the regular expression {}",
                self.pattern.as_str()
            )));
        }
        Ok(())
    }

    fn describe(&self, schema: &mut SchemaObject) {
        schema.pattern = Some(self.pattern.as_str().to_string());
    }
}

/// IPv4 or IPv6 address.
#[derive(Debug, Clone, Copy, Default)]
pub struct IpAddress;

impl Validator for IpAddress {
    fn validate(&self, req: &Request, name: &str) -> Result<(), ValidationError> {
        let value = require_string(req, name)?;
        value.parse::<IpAddr>().map(drop).map_err(|_| {
            ValidationError::new(format!("parameter {name} must be a valid IP address"))
        })
    }

    fn describe(&self, schema: &mut SchemaObject) {
        schema.set_type("string");
    }
}

/// North-American style number (`555-123-4567`, `(555) 123 4567 x12`)
/// with an optional literal prefix such as `+1`.
#[derive(Debug, Clone)]
pub struct PhoneNumber {
    prefix: String,
    pattern: Regex,
}

impl PhoneNumber {
    pub fn new(prefix: impl Into<String>) -> Result<Self, regex::Error> {
        let prefix = prefix.into();
        let pattern = Regex::new(&format!(
            r"^(?:{})?\(?\d{{3}}\)?[- ]?\d{{3}}[- ]?\d{{4}}(?: *x\d+)?$",
            regex::escape(&prefix)
        ))?;
        Ok(Self { prefix, pattern })
    }
}

impl Validator for PhoneNumber {
    fn validate(&self, req: &Request, name: &str) -> Result<(), ValidationError> {
        let value = require_string(req, name)?;
        if !self.pattern.is_match(&value) {
            return Err(ValidationError::new(format!(
                "parameter {name} must be a valid phone number with prefix {}",
                self.prefix
            )));
        }
        Ok(())
    }

    fn describe(&self, schema: &mut SchemaObject) {
        schema.set_type("string");
    }
}
