use serde::Deserialize;

use crate::domain::{DomainError, KeyPolicy};
use crate::infrastructure::storage::{MongoConfig, PostgresConfig, StoreConfig, StoreType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub keys: KeyPolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Document store settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `memory`, `postgres` or `mongodb`
    pub backend: String,
    /// Connection URL; falls back to `DATABASE_URL` or `MONGODB_URI`
    pub url: Option<String>,
    /// MongoDB database name
    pub database: String,
    /// Collection (MongoDB) or table (PostgreSQL) holding the keys
    pub collection: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            url: None,
            database: "splatpal".to_string(),
            collection: "api_keys".to_string(),
            max_connections: 10,
            connect_timeout_secs: 5,
        }
    }
}

impl StorageConfig {
    pub fn store_type(&self) -> Result<StoreType, DomainError> {
        StoreType::from_str(&self.backend).ok_or_else(|| {
            DomainError::invalid_argument(format!("Unknown storage backend '{}'", self.backend))
        })
    }

    /// Builds the store configuration, reading URL fallbacks from the process environment
    pub fn store_config(&self) -> Result<StoreConfig, DomainError> {
        self.store_config_with_env(|name| std::env::var(name).ok())
    }

    fn store_config_with_env<F>(&self, env: F) -> Result<StoreConfig, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = self.url.clone().filter(|url| !url.is_empty());

        match self.store_type()? {
            StoreType::InMemory => Ok(StoreConfig::in_memory()),
            StoreType::Postgres => {
                let mut config = PostgresConfig::default()
                    .with_table(self.collection.clone())
                    .with_max_connections(self.max_connections)
                    .with_connect_timeout(self.connect_timeout_secs);
                if let Some(url) = url.or_else(|| env("DATABASE_URL")) {
                    config.url = url;
                }
                Ok(StoreConfig::postgres(config))
            }
            StoreType::MongoDb => {
                let mut config = MongoConfig::default()
                    .with_database(self.database.clone())
                    .with_collection(self.collection.clone());
                if let Some(url) = url.or_else(|| env("MONGODB_URI")) {
                    config.uri = url;
                }
                Ok(StoreConfig::mongodb(config))
            }
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
