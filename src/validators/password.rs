use super::{require_string, ValidationError, Validator};
use crate::request::Request;

const SYMBOLS: &str = r"!@#$%^&*()_+{}[]:;<>?,.|\/~";

/// Password policy. Contributes nothing to the schema.
#[derive(Debug, Clone, Copy)]
pub struct Password {
    pub min_length: usize,
    pub max_length: usize,
    pub require_symbols: bool,
    pub require_numbers: bool,
    pub require_upper: bool,
}

impl Password {
    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
            require_symbols: false,
            require_numbers: false,
            require_upper: false,
        }
    }

    pub fn symbols(mut self) -> Self {
        self.require_symbols = true;
        self
    }

    pub fn numbers(mut self) -> Self {
        self.require_numbers = true;
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.require_upper = true;
        self
    }
}

impl Validator for Password {
    fn validate(&self, req: &Request, name: &str) -> Result<(), ValidationError> {
        let password = require_string(req, name)?;

        let len = password.chars().count();
        if len < self.min_length || len > self.max_length {
            return Err(ValidationError::new(format!(
                "parameter {name} must have length between {} and {}",
                self.min_length, self.max_length
            )));
        }
        if self.require_symbols && !password.chars().any(|c| SYMBOLS.contains(c)) {
            return Err(ValidationError::new("password must contain at least one symbol"));
        }
        if self.require_numbers && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(ValidationError::new("password must contain at least one number"));
        }
        if self.require_upper && !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::new(
                "password must contain at least one uppercase letter",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::SchemaObject;
    use serde_json::json;

    #[test]
    fn test_policy_checks_in_order() {
        let policy = Password::new(8, 16).symbols().numbers().uppercase();
        let check = |pw: &str| {
            policy
                .validate(&Request::from_parameters([("pw", json!(pw))]), "pw")
                .map_err(|e| e.message().to_string())
        };

        assert_eq!(
            check("short"),
            Err("parameter pw must have length between 8 and 16".to_string())
        );
        assert_eq!(
            check("longenough"),
            Err("password must contain at least one symbol".to_string())
        );
        assert_eq!(
            check("longenough!"),
            Err("password must contain at least one number".to_string())
        );
        assert_eq!(
            check("longenough!1"),
            Err("password must contain at least one uppercase letter".to_string())
        );
        assert_eq!(check("Longenough!1"), Ok(()));
    }

    #[test]
    fn test_no_schema_contribution() {
        let mut schema = SchemaObject::default();
        Password::new(1, 2).describe(&mut schema);
        assert_eq!(schema, SchemaObject::default());
    }
}
