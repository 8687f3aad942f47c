//! Shared types for the bug tracker
//!
//! Domain models used by the data-access layer and by anything that
//! serves them over the wire.

pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};
