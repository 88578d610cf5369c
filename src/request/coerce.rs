//! Value coercion shared by the request accessors and the validators.
//!
//! Values arrive either as strings (query, form, path, headers) or as native
//! JSON values (request body). A string is accepted for a scalar target when
//! it parses to that target; a native value of the wrong type is rejected.

use serde_json::{Map, Value};
use thiserror::Error;

/// Failure of a typed parameter lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// No value was supplied under that name.
    #[error("parameter '{name}' not found")]
    NotFound { name: String },

    /// A value was supplied but cannot be read as the requested type.
    #[error("parameter '{name}' is not {expected}")]
    WrongType { name: String, expected: &'static str },
}

impl CoercionError {
    pub fn name(&self) -> &str {
        match self {
            CoercionError::NotFound { name } | CoercionError::WrongType { name, .. } => name,
        }
    }
}

/// Target of a coercion, named the way error messages describe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Int,
    Float,
    Bool,
    Array,
    Map,
}

impl Kind {
    fn article(self) -> &'static str {
        match self {
            Kind::String => "a string",
            Kind::Int => "an integer",
            Kind::Float => "a float",
            Kind::Bool => "a boolean",
            Kind::Array => "an array",
            Kind::Map => "a map",
        }
    }

    /// Short type name used by the type validators.
    pub fn label(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Bool => "bool",
            Kind::Array => "array",
            Kind::Map => "map",
        }
    }
}

fn wrong_type(name: &str, kind: Kind) -> CoercionError {
    CoercionError::WrongType {
        name: name.to_string(),
        expected: kind.article(),
    }
}

pub fn to_string(name: &str, value: &Value) -> Result<String, CoercionError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(wrong_type(name, Kind::String)),
    }
}

pub fn to_int(name: &str, value: &Value) -> Result<i64, CoercionError> {
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| wrong_type(name, Kind::Int)),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| wrong_type(name, Kind::Int)),
        _ => Err(wrong_type(name, Kind::Int)),
    }
}

pub fn to_float(name: &str, value: &Value) -> Result<f64, CoercionError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| wrong_type(name, Kind::Float)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| wrong_type(name, Kind::Float)),
        _ => Err(wrong_type(name, Kind::Float)),
    }
}

pub fn to_bool(name: &str, value: &Value) -> Result<bool, CoercionError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => parse_bool(s).ok_or_else(|| wrong_type(name, Kind::Bool)),
        _ => Err(wrong_type(name, Kind::Bool)),
    }
}

pub fn to_array<'a>(name: &str, value: &'a Value) -> Result<&'a Vec<Value>, CoercionError> {
    value.as_array().ok_or_else(|| wrong_type(name, Kind::Array))
}

pub fn to_map<'a>(name: &str, value: &'a Value) -> Result<&'a Map<String, Value>, CoercionError> {
    value.as_object().ok_or_else(|| wrong_type(name, Kind::Map))
}

/// Accepts the same spellings as a conventional `ParseBool`.
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Check that `value` can be read as `kind` without keeping the result.
pub fn check(name: &str, value: &Value, kind: Kind) -> Result<(), CoercionError> {
    match kind {
        Kind::String => to_string(name, value).map(drop),
        Kind::Int => to_int(name, value).map(drop),
        Kind::Float => to_float(name, value).map(drop),
        Kind::Bool => to_bool(name, value).map(drop),
        Kind::Array => to_array(name, value).map(drop),
        Kind::Map => to_map(name, value).map(drop),
    }
}
