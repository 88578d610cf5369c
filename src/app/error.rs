use thiserror::Error;

/// Misuse of the declaration API, detected before anything is served.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("path {0} already registered")]
    DuplicatePath(String),

    #[error("path {path:?} is invalid: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("path {path} conflicts with {existing}: captures at the same position must match")]
    ConflictingPath { path: String, existing: String },

    #[error("route {path}: {requires} must be declared before {call}")]
    OutOfOrder {
        path: String,
        call: &'static str,
        requires: &'static str,
    },

    #[error("route {path}: at least one method is required")]
    EmptyMethods { path: String },

    #[error("route {path}: description must not be empty")]
    EmptyDescription { path: String },

    #[error("route {path} has no action")]
    MissingAction { path: String },

    #[error("path {path} collides with the docs, schema or an included service")]
    ReservedPath { path: String },

    #[error("failed to serialize OpenAPI document: {0}")]
    SchemaSerialization(String),
}
