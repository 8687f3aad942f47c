use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppResult;
use sqlx::SqlitePool;

/// Process-wide state: configuration and the store handle
///
/// Cheap to clone; the pool is reference counted.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
}

impl ServerState {
    /// Open the configured database and apply migrations
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_path, config.max_connections).await?;
        Ok(Self {
            config: config.clone(),
            db,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initialize_opens_the_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.db");
        let config = Config::with_database(path.to_str().unwrap());

        let state = ServerState::initialize(&config).await.unwrap();
        assert_eq!(state.config.database_path, config.database_path);
        let tickets: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ticket")
            .fetch_one(state.pool())
            .await
            .unwrap();
        assert_eq!(tickets, 0);
        assert!(path.exists());
    }
}
