//! Core module - configuration and process state
//!
//! - [`Config`] - environment-driven configuration
//! - [`ServerState`] - configuration plus the opened store

pub mod config;
pub mod state;

pub use config::Config;
pub use state::ServerState;
