//! Splatpal
//!
//! Issues, looks up, updates and revokes API keys persisted in a document
//! store, with:
//! - In-memory, PostgreSQL and MongoDB store backends
//! - A thin HTTP surface over the key registry

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use api::state::AppState;
use domain::DomainError;
use infrastructure::storage::StoreFactory;
use tracing::info;

/// Create the application state with the default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
///
/// Connects the configured store and pings it, so an unreachable store is
/// reported here instead of on the first request.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    config.keys.validate().map_err(DomainError::from)?;

    let store_config = config.storage.store_config()?;
    let store = StoreFactory::create(&store_config).await?;
    store.ping().await?;

    info!(
        backend = store.backend(),
        key_length = config.keys.length,
        enforce_length = config.keys.enforce_length,
        "Document store ready"
    );

    Ok(AppState::with_store(store, config.keys))
}
