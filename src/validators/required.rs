use super::{required_error, ValidationError, Validator};
use crate::request::Request;

/// Presence check. Marks the parameter as required in the schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Validator for Required {
    fn validate(&self, req: &Request, name: &str) -> Result<(), ValidationError> {
        if req.contains(name) {
            Ok(())
        } else {
            Err(required_error(name))
        }
    }

    fn is_required(&self) -> bool {
        true
    }
}
