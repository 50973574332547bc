//! Shared types for the vitals firmware core
//!
//! This crate contains the published vitals data model, the status bitfield,
//! the shared sensor error type, and the wire-frame codec used by the
//! wireless publishing collaborator.

pub mod comms;
pub mod error;
pub mod snapshot;

// Re-export commonly used types
pub use comms::*;
pub use error::*;
pub use snapshot::*;
