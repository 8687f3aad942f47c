//! Data models
//!
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY). An entity whose `id` is
//! `None` has not been persisted yet.

pub mod label;
pub mod project;
pub mod ticket;
pub mod user;

// Re-exports
pub use label::*;
pub use project::*;
pub use ticket::*;
pub use user::*;
