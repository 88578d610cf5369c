//! OpenAPI projection.
//!
//! # Data Flow
//! ```text
//! frozen App
//!     → projector.rs (routes × methods → operations)
//!     → schema.rs (document model, serialized once)
//!     → served at the schema path; docs.rs renders the UI shell
//! ```

pub mod docs;
pub mod projector;
pub mod schema;

pub use projector::{project, render_document};
pub use schema::{OpenApiDocument, SchemaObject};
