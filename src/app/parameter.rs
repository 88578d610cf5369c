use std::fmt;

use serde::Serialize;

use crate::validators::Validator;

/// Where a parameter is read from, as named in the OpenAPI `in` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParamLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
            ParamLocation::Header => "header",
            ParamLocation::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named input with its ordered validator chain.
#[derive(Debug)]
pub struct Parameter {
    pub name: String,
    pub location: ParamLocation,
    pub validators: Vec<Box<dyn Validator>>,
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        location: ParamLocation,
        validators: Vec<Box<dyn Validator>>,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            validators,
        }
    }

    /// True when any validator in the chain enforces presence.
    pub fn is_required(&self) -> bool {
        self.validators.iter().any(|v| v.is_required())
    }
}
