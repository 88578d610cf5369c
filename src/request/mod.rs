//! Request context subsystem.
//!
//! # Data Flow
//! ```text
//! axum request (parts, path captures, body bytes, peer address)
//!     → context.rs (merge path/form/query/JSON into one table)
//!     → coerce.rs (typed reads shared with the validators)
//!     → Request handed to validators, middleware and the action
//! ```

pub mod coerce;
pub mod context;

pub use coerce::CoercionError;
pub use context::{RawRequest, Request, RequestError};
