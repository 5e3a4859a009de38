use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;
use validator::Validate;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_MIN_CONNECTIONS: u32 = 1;

/// Application configuration, layered from `config/default.toml`, an
/// environment-specific file and `APP_`-prefixed environment variables.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Inventory store connection URL.
    #[validate(length(min = 1))]
    pub database_url: String,

    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging).
    #[serde(default)]
    pub log_json: bool,

    /// Optional wall-clock budget for one evaluation run, in
    /// milliseconds. Absent means no deadline.
    #[serde(default)]
    pub evaluation_deadline_ms: Option<u64>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_db_max_connections() -> u32 {
    DEFAULT_DB_MAX_CONNECTIONS
}

fn default_db_min_connections() -> u32 {
    DEFAULT_DB_MIN_CONNECTIONS
}

impl AppConfig {
    /// Load configuration for the environment named by `APP_ENV`
    /// (default "development").
    pub fn load() -> Result<Self, ConfigError> {
        let environment = env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

        let config = Config::builder()
            .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
            .add_source(
                File::with_name(&format!("{}/{}", CONFIG_DIR, environment)).required(false),
            )
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        let app: AppConfig = config.try_deserialize()?;
        app.validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(app)
    }

    pub fn evaluation_deadline(&self) -> Option<Duration> {
        self.evaluation_deadline_ms.map(Duration::from_millis)
    }
}
