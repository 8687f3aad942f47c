//! Repository Module
//!
//! Async data access over the SQLite pool. Each repository is a set of
//! functions taking the pool explicitly.
//!
//! - [`row_mapper`] - flat, prefix-aliased rows into domain objects
//! - [`link_table`] - junction table maintenance
//! - [`ticket_query`] - eager-loading ticket SELECT builder
//! - [`ticket`] - ticket reads and writes

pub mod link_table;
pub mod row_mapper;
pub mod ticket;
pub mod ticket_query;

pub use link_table::LinkTable;
pub use ticket_query::{Criteria, Direction, Pageable, Sort, SqlValue, TicketColumn, TicketQuery};

use thiserror::Error;

/// Repository error types
///
/// A missing row on read is not an error: reads return `Option`.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The UPDATE matched no row: the id is stale or was never persisted
    #[error("Unable to update ticket with id = {0}")]
    StaleUpdate(i64),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
