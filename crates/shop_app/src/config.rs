//! Application configuration
//!
//! Values are layered: built-in defaults, then a `.env` file if present,
//! then `SHOP_*` environment variables.
//!
//! | Variable                | Default                             |
//! |-------------------------|-------------------------------------|
//! | `SHOP_DATABASE_URL`     | `sqlite://cajun_marine.db?mode=rwc` |
//! | `SHOP_BUSY_TIMEOUT_MS`  | `5000`                              |
//! | `SHOP_MAX_CONNECTIONS`  | `5`                                 |
//! | `SHOP_LOG_LEVEL`        | `info`                              |
//! | `SHOP_LOG_JSON`         | `false`                             |

use serde::Deserialize;
use std::time::Duration;

use infra_db::DatabaseConfig;

use crate::error::AppError;

/// Shop application configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopConfig {
    /// SQLite connection string
    pub database_url: String,
    /// How long a write waits on a locked database
    pub busy_timeout_ms: u64,
    pub max_connections: u32,
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://cajun_marine.db?mode=rwc".to_string(),
            busy_timeout_ms: 5000,
            max_connections: 5,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl ShopConfig {
    /// Loads configuration from `.env` and the process environment
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_source(config::Environment::with_prefix("SHOP").try_parsing(true))
    }

    /// Loads configuration from an explicit environment source over the defaults
    pub fn from_source(environment: config::Environment) -> Result<Self, AppError> {
        let defaults = Self::default();
        let config: Self = config::Config::builder()
            .set_default("database_url", defaults.database_url)?
            .set_default("busy_timeout_ms", defaults.busy_timeout_ms)?
            .set_default("max_connections", defaults.max_connections)?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_json", defaults.log_json)?
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.database_url.trim().is_empty() {
            return Err(AppError::invalid_config("database_url", "must not be empty"));
        }
        if self.busy_timeout_ms == 0 {
            return Err(AppError::invalid_config("busy_timeout_ms", "must be greater than zero"));
        }
        if self.max_connections == 0 {
            return Err(AppError::invalid_config("max_connections", "must be greater than zero"));
        }
        Ok(())
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// The pool settings for this configuration
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone())
            .max_connections(self.max_connections)
            .busy_timeout(self.busy_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("SHOP")
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = ShopConfig::from_source(env(&[])).unwrap();
        assert_eq!(config, ShopConfig::default());
    }

    #[test]
    fn test_environment_overrides_defaults() {
        let config = ShopConfig::from_source(env(&[
            ("SHOP_DATABASE_URL", "sqlite::memory:"),
            ("SHOP_BUSY_TIMEOUT_MS", "250"),
            ("SHOP_LOG_JSON", "true"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.busy_timeout(), Duration::from_millis(250));
        assert!(config.log_json);
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_zero_busy_timeout_is_rejected() {
        let result = ShopConfig::from_source(env(&[("SHOP_BUSY_TIMEOUT_MS", "0")]));
        assert!(matches!(result, Err(AppError::InvalidConfig { .. })));
    }

    #[test]
    fn test_unparseable_number_is_a_config_error() {
        let result = ShopConfig::from_source(env(&[("SHOP_MAX_CONNECTIONS", "lots")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_database_config_carries_pool_settings() {
        let config = ShopConfig {
            max_connections: 2,
            busy_timeout_ms: 1500,
            ..ShopConfig::default()
        };
        let db = config.database_config();

        assert_eq!(db.max_connections, 2);
        assert_eq!(db.busy_timeout, Duration::from_millis(1500));
        assert_eq!(db.url, config.database_url);
    }
}
