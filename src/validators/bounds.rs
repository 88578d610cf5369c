use super::{require_float, require_string, ValidationError, Validator};
use crate::openapi::SchemaObject;
use crate::request::Request;

/// String whose length in characters lies in `min..=max`.
#[derive(Debug, Clone, Copy)]
pub struct StringLength {
    pub min: usize,
    pub max: usize,
}

impl StringLength {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

impl Validator for StringLength {
    fn validate(&self, req: &Request, name: &str) -> Result<(), ValidationError> {
        let value = require_string(req, name)?;
        let len = value.chars().count();
        if len < self.min || len > self.max {
            return Err(ValidationError::new(format!(
                "parameter {name} length must be between {} and {} characters",
                self.min, self.max
            )));
        }
        Ok(())
    }

    fn describe(&self, schema: &mut SchemaObject) {
        schema.set_type("string");
        schema.min_length = Some(self.min as u64);
        schema.max_length = Some(self.max as u64);
    }
}

/// Number in the closed interval `min..=max`.
#[derive(Debug, Clone, Copy)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Validator for Range {
    fn validate(&self, req: &Request, name: &str) -> Result<(), ValidationError> {
        let value = require_float(req, name)?;
        if !(self.min..=self.max).contains(&value) {
            return Err(ValidationError::new(format!(
                "parameter {name} must be between {:.6} and {:.6}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    fn describe(&self, schema: &mut SchemaObject) {
        schema.minimum = Some(self.min);
        schema.maximum = Some(self.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_range() {
        let range = Range::new(5.0, 25.0);
        let req = Request::from_parameters([
            ("ok", json!(20)),
            ("edge", json!("25")),
            ("high", json!(99)),
            ("text", json!("abc")),
        ]);
        assert!(range.validate(&req, "ok").is_ok());
        assert!(range.validate(&req, "edge").is_ok());
        assert_eq!(
            range.validate(&req, "high").unwrap_err().message(),
            "parameter high must be between 5.000000 and 25.000000"
        );
        assert_eq!(
            range.validate(&req, "text").unwrap_err().message(),
            "parameter text must be of type 'float'"
        );
    }

    #[test]
    fn test_range_reports_missing_value() {
        let req = Request::from_parameters(Vec::<(String, serde_json::Value)>::new());
        assert_eq!(
            Range::new(5.0, 25.0).validate(&req, "age").unwrap_err().message(),
            "parameter age is required"
        );
    }

    #[test]
    fn test_string_length_counts_characters() {
        let len = StringLength::new(2, 4);
        let req = Request::from_parameters([
            ("short", json!("a")),
            ("accents", json!("éèêë")),
            ("long", json!("abcde")),
        ]);
        assert!(len.validate(&req, "accents").is_ok());
        assert_eq!(
            len.validate(&req, "short").unwrap_err().message(),
            "parameter short length must be between 2 and 4 characters"
        );
        assert!(len.validate(&req, "long").is_err());
    }

    #[test]
    fn test_describe() {
        let mut schema = SchemaObject::default();
        StringLength::new(1, 10).describe(&mut schema);
        Range::new(0.0, 1.5).describe(&mut schema);
        assert_eq!(schema.kind.as_deref(), Some("string"));
        assert_eq!(schema.min_length, Some(1));
        assert_eq!(schema.max_length, Some(10));
        assert_eq!(schema.minimum, Some(0.0));
        assert_eq!(schema.maximum, Some(1.5));
    }
}
