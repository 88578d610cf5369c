//! Pure type validators. An absent value passes.

use super::{check_type, ValidationError, Validator};
use crate::openapi::SchemaObject;
use crate::request::coerce::Kind;
use crate::request::Request;

macro_rules! type_validator {
    ($(#[$doc:meta])* $name:ident, $kind:expr, $schema_type:expr, $format:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Validator for $name {
            fn validate(&self, req: &Request, name: &str) -> Result<(), ValidationError> {
                check_type(req, name, $kind)
            }

            fn describe(&self, schema: &mut SchemaObject) {
                schema.set_type($schema_type);
                let format: Option<&str> = $format;
                if let Some(format) = format {
                    schema.set_format(format);
                }
            }
        }
    };
}

type_validator!(IsString, Kind::String, "string", None);
type_validator!(
    /// Accepts JSON integers and strings that parse as `i64`.
    IsInt,
    Kind::Int,
    "integer",
    Some("int64")
);
type_validator!(
    /// Accepts any JSON number and strings that parse as `f64`.
    IsFloat,
    Kind::Float,
    "number",
    Some("float")
);
type_validator!(IsBool, Kind::Bool, "boolean", None);
type_validator!(IsArray, Kind::Array, "array", None);
type_validator!(IsMap, Kind::Map, "object", None);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_value_passes() {
        let req = Request::from_parameters(Vec::<(String, serde_json::Value)>::new());
        assert!(IsInt.validate(&req, "n").is_ok());
        assert!(IsMap.validate(&req, "n").is_ok());
    }

    #[test]
    fn test_string_numbers_are_coerced() {
        let req = Request::from_parameters([("n", json!("25")), ("f", json!("2.5"))]);
        assert!(IsInt.validate(&req, "n").is_ok());
        assert!(IsFloat.validate(&req, "f").is_ok());
        assert_eq!(req.get_int("n"), Ok(25));
    }

    #[test]
    fn test_wrong_native_type_is_rejected() {
        let req = Request::from_parameters([
            ("s", json!(42)),
            ("b", json!("yes")),
            ("a", json!({"k": 1})),
        ]);
        assert_eq!(
            IsString.validate(&req, "s").unwrap_err().message(),
            "parameter s must be of type 'string'"
        );
        assert_eq!(
            IsBool.validate(&req, "b").unwrap_err().message(),
            "parameter b must be of type 'bool'"
        );
        assert_eq!(
            IsArray.validate(&req, "a").unwrap_err().message(),
            "parameter a must be of type 'array'"
        );
        assert!(IsMap.validate(&req, "a").is_ok());
    }

    #[test]
    fn test_describe() {
        let mut schema = SchemaObject::default();
        IsInt.describe(&mut schema);
        assert_eq!(schema.kind.as_deref(), Some("integer"));
        assert_eq!(schema.format.as_deref(), Some("int64"));

        let mut schema = SchemaObject::default();
        IsMap.describe(&mut schema);
        assert_eq!(schema.kind.as_deref(), Some("object"));
        assert_eq!(schema.format, None);
    }
}
