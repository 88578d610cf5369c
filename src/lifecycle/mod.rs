//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Logging → Metrics → Freeze app → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     Ctrl+C / SIGTERM → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: configuration and registry errors abort before binding
//! - Listener binds last, so traffic only arrives once routes are frozen

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
