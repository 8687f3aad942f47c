//! Application error handling
//!
//! [`AppError`] covers everything outside the repository layer: reading
//! configuration, opening the store and running migrations. Repository
//! failures are wrapped through `From<RepoError>`.

use crate::db::repository::RepoError;

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Database(e) => AppError::Database(e.to_string()),
            other => AppError::internal(other.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal(format!("JSON encoding failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_errors_keep_their_category() {
        let stale: AppError = RepoError::StaleUpdate(4).into();
        assert!(matches!(stale, AppError::Internal(ref m) if m.contains("id = 4")));

        let db: AppError = RepoError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(db, AppError::Database(_)));
    }

    #[test]
    fn io_and_json_failures_are_internal() {
        let io: AppError = std::io::Error::other("pipe closed").into();
        assert!(matches!(io, AppError::Internal(ref m) if m == "pipe closed"));

        let json: AppError = serde_json::from_str::<i64>("x").unwrap_err().into();
        assert!(matches!(json, AppError::Internal(ref m) if m.starts_with("JSON encoding failed")));

        let config = AppError::config("bad LOG_DIR");
        assert_eq!(config.to_string(), "Configuration error: bad LOG_DIR");
    }
}
