//! Unified Result Types

use crate::AppError;

/// Application-level Result type
///
/// Used by bootstrap code and the binary
pub type AppResult<T> = Result<T, AppError>;
