//! Security providers.
//!
//! # Data Flow
//! ```text
//! App::security(&provider)
//!     → requirement + scheme recorded for the generated document
//! RequireAuth::new(provider) as middleware
//!     → provider.is_authenticated(request) or 401
//! ```
//!
//! # Design Decisions
//! - Declaring a requirement and enforcing it are separate steps, so a
//!   document can advertise optional security while routes decide
//!   individually whether to enforce it.
//! - Fail closed: a missing credential is an unauthenticated request.

mod api_key;
mod require_auth;

pub use api_key::ApiKeySecurity;
pub use require_auth::RequireAuth;

use crate::openapi::schema::SecurityScheme;
use crate::request::Request;

pub trait SecurityProvider: Send + Sync {
    /// Scheme name used in requirements and `components.securitySchemes`.
    fn name(&self) -> &str;

    fn scopes(&self) -> Vec<String> {
        Vec::new()
    }

    /// Scheme definition for the document, if the provider has one.
    fn scheme(&self) -> Option<SecurityScheme> {
        None
    }

    fn is_authenticated(&self, req: &Request) -> bool;
}
