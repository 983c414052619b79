//! Application state shared by the HTTP handlers

use std::sync::Arc;

use crate::domain::document::DocumentStore;
use crate::domain::KeyPolicy;
use crate::infrastructure::api_key::ApiKeyRegistry;

#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<ApiKeyRegistry>,
}

impl AppState {
    pub fn new(registry: ApiKeyRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// State over a store with the given key policy
    pub fn with_store(store: Arc<dyn DocumentStore>, policy: KeyPolicy) -> Self {
        Self::new(ApiKeyRegistry::with_policy(store, policy))
    }
}
