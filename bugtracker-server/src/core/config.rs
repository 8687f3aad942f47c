/// Store and process configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATABASE_PATH | bugtracker.db | SQLite database file |
/// | DB_MAX_CONNECTIONS | 5 | Pool size |
/// | LOG_LEVEL | info | Default log filter (RUST_LOG wins) |
/// | LOG_JSON | false | Emit JSON log lines |
/// | LOG_DIR | - | Daily rolling log files when set |
/// | ENVIRONMENT | development | development / production |
///
/// # Example
///
/// ```ignore
/// DATABASE_PATH=/data/tracker.db LOG_LEVEL=debug cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file
    pub database_path: String,
    /// Upper bound of pooled connections
    pub max_connections: u32,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// development | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparseable values fall back to defaults
    pub fn from_env() -> Self {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            database_path: lookup("DATABASE_PATH").unwrap_or_else(|| "bugtracker.db".into()),
            max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(5),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: lookup("LOG_JSON")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: lookup("LOG_DIR").filter(|v| !v.is_empty()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".into()),
        }
    }

    /// Override the database location, keeping everything else
    ///
    /// Mostly used in tests
    pub fn with_database(database_path: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.database_path = database_path.into();
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_source(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.database_path, "bugtracker.db");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert!(config.log_dir.is_none());
        assert!(config.is_development());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("DATABASE_PATH", "/tmp/t.db"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("LOG_JSON", "true"),
            ("LOG_DIR", "/var/log/tracker"),
            ("ENVIRONMENT", "production"),
        ]);
        assert_eq!(config.database_path, "/tmp/t.db");
        assert_eq!(config.max_connections, 12);
        assert!(config.log_json);
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/tracker"));
        assert!(config.is_production());
    }

    #[test]
    fn garbage_values_fall_back() {
        let config = config_from(&[
            ("DB_MAX_CONNECTIONS", "lots"),
            ("LOG_JSON", "yes please"),
            ("LOG_DIR", ""),
        ]);
        assert_eq!(config.max_connections, 5);
        assert!(!config.log_json);
        assert!(config.log_dir.is_none());

        assert_eq!(config_from(&[("DB_MAX_CONNECTIONS", "0")]).max_connections, 5);
    }
}
