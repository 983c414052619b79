//! Store factory for runtime backend selection

use std::sync::Arc;

use tracing::info;

use crate::domain::document::DocumentStore;
use crate::domain::DomainError;

use super::in_memory::InMemoryDocumentStore;
use super::mongo::{MongoConfig, MongoDocumentStore};
use super::postgres::{PostgresConfig, PostgresDocumentStore};

/// Supported store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// In-memory store (for testing/development)
    InMemory,
    /// PostgreSQL store
    Postgres,
    /// MongoDB store
    MongoDb,
}

impl StoreType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            "mongodb" | "mongo" => Some(Self::MongoDb),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InMemory => "memory",
            Self::Postgres => "postgres",
            Self::MongoDb => "mongodb",
        }
    }
}

/// Store configuration
#[derive(Debug, Clone)]
pub enum StoreConfig {
    InMemory,
    Postgres(PostgresConfig),
    MongoDb(MongoConfig),
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    pub fn mongodb(config: MongoConfig) -> Self {
        Self::MongoDb(config)
    }

    /// Returns the store type
    pub fn store_type(&self) -> StoreType {
        match self {
            Self::InMemory => StoreType::InMemory,
            Self::Postgres(_) => StoreType::Postgres,
            Self::MongoDb(_) => StoreType::MongoDb,
        }
    }
}

/// Factory for creating document stores
#[derive(Debug)]
pub struct StoreFactory;

impl StoreFactory {
    /// Creates a connected store for the configuration
    ///
    /// Network backends verify connectivity before returning, so an
    /// unreachable server surfaces here as `StoreUnavailable`.
    pub async fn create(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, DomainError> {
        info!(backend = config.store_type().as_str(), "Creating document store");

        match config {
            StoreConfig::InMemory => Ok(Arc::new(InMemoryDocumentStore::new())),
            StoreConfig::Postgres(pg_config) => {
                let store = PostgresDocumentStore::connect(pg_config).await?;
                Ok(Arc::new(store))
            }
            StoreConfig::MongoDb(mongo_config) => {
                let store = MongoDocumentStore::connect(mongo_config).await?;
                Ok(Arc::new(store))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_type_from_str() {
        assert_eq!(StoreType::from_str("memory"), Some(StoreType::InMemory));
        assert_eq!(StoreType::from_str("In-Memory"), Some(StoreType::InMemory));
        assert_eq!(StoreType::from_str("postgres"), Some(StoreType::Postgres));
        assert_eq!(StoreType::from_str("pg"), Some(StoreType::Postgres));
        assert_eq!(StoreType::from_str("mongodb"), Some(StoreType::MongoDb));
        assert_eq!(StoreType::from_str("MONGO"), Some(StoreType::MongoDb));
        assert_eq!(StoreType::from_str("unknown"), None);
    }

    #[test]
    fn test_store_type_as_str_round_trips() {
        for store_type in [StoreType::InMemory, StoreType::Postgres, StoreType::MongoDb] {
            assert_eq!(StoreType::from_str(store_type.as_str()), Some(store_type));
        }
    }

    #[test]
    fn test_store_config_types() {
        assert_eq!(StoreConfig::in_memory().store_type(), StoreType::InMemory);
        assert_eq!(
            StoreConfig::postgres(PostgresConfig::new("postgres://localhost/test")).store_type(),
            StoreType::Postgres
        );
        assert_eq!(
            StoreConfig::mongodb(MongoConfig::default()).store_type(),
            StoreType::MongoDb
        );
    }

    #[tokio::test]
    async fn test_create_in_memory() {
        let store = StoreFactory::create(&StoreConfig::in_memory()).await.unwrap();

        assert_eq!(store.backend(), "memory");
        assert!(store.ping().await.is_ok());
    }
}
