//! Bug Tracker Server - data-access core
//!
//! # Architecture
//!
//! - **Configuration** (`core`): environment-driven settings and process state
//! - **Database** (`db`): SQLite pool, embedded migrations, repositories
//! - **Export** (`export`): JSON lines dump of every ticket
//! - **Utilities** (`utils`): error type and logging setup
//!
//! # Module layout
//!
//! ```text
//! bugtracker-server/src/
//! ├── core/                  # Config, ServerState
//! ├── db/                    # DbService + migrations
//! │   └── repository/        # row mappers, link table, ticket query, ticket repository
//! ├── export.rs              # JSON lines export
//! └── utils/                 # AppError, logger
//! ```

pub mod core;
pub mod db;
pub mod export;
pub mod utils;

// Re-export common types
pub use crate::core::{Config, ServerState};
pub use db::DbService;
pub use db::repository::{RepoError, RepoResult};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// Load `.env`, read the configuration and install the logger
pub fn setup_environment() -> AppResult<Config> {
    // A missing .env file is fine
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = Config::from_env();
    if let Some(dir) = config.log_dir.as_deref() {
        std::fs::create_dir_all(dir)
            .map_err(|e| AppError::config(format!("Cannot create log dir {dir}: {e}")))?;
    }
    init_logger_with_file(
        Some(&config.log_level),
        config.log_json,
        config.log_dir.as_deref(),
    );

    tracing::debug!(dotenv_loaded, environment = %config.environment, "Environment ready");
    Ok(config)
}
