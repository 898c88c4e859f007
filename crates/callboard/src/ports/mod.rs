//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the domain layer
//! interacts with external systems (storage, clock).
//!
//! Implementations of these traits live in `adapters/` and in the CLI.

pub mod repositories;
pub mod services;

// Re-exports
pub use repositories::*;
pub use services::*;
