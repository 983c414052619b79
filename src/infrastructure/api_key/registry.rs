//! API Key registry
//!
//! Validates caller input, builds store filters and delegates every
//! operation to the document store. Holds no state of its own beyond the
//! store handle, so one instance can be shared across request handlers.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::api_key::{
    key_prefix, validate_name, ApiKey, ApiKeyId, ApiKeyUpdate, ApiKeyValidationError, KeyPolicy,
    KEY_FIELD, NAME_FIELD,
};
use crate::domain::document::{build_filter, DocumentStore, Filter, ID_FIELD};
use crate::domain::DomainError;

use super::generator::ApiKeyGenerator;

/// Registry mediating between callers and the document store
pub struct ApiKeyRegistry {
    store: Arc<dyn DocumentStore>,
    generator: ApiKeyGenerator,
    policy: KeyPolicy,
}

impl fmt::Debug for ApiKeyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyRegistry")
            .field("backend", &self.store.backend())
            .field("policy", &self.policy)
            .finish()
    }
}

impl ApiKeyRegistry {
    /// Create a registry over the given store with the default key policy
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_policy(store, KeyPolicy::default())
    }

    /// Create a registry with a custom key policy
    pub fn with_policy(store: Arc<dyn DocumentStore>, policy: KeyPolicy) -> Self {
        Self {
            store,
            generator: ApiKeyGenerator::new(policy.length),
            policy,
        }
    }

    pub fn policy(&self) -> &KeyPolicy {
        &self.policy
    }

    /// Create a new API key and return the identifier the store assigned
    ///
    /// When `key` is `None` a random value of the policy length is generated.
    pub async fn create_api_key(
        &self,
        name: &str,
        key: Option<&str>,
    ) -> Result<ApiKeyId, DomainError> {
        Ok(self.issue_api_key(name, key).await?.id().clone())
    }

    /// Create a new API key and return the persisted record
    pub async fn issue_api_key(&self, name: &str, key: Option<&str>) -> Result<ApiKey, DomainError> {
        validate_name(name)?;

        let key = match key {
            Some(key) => {
                self.policy.validate_key(key)?;
                key.to_string()
            }
            None => {
                self.policy.validate()?;
                self.generator.generate()
            }
        };

        let id = self.store.insert(ApiKey::new_fields(name, &key)).await?;
        let api_key = ApiKey::new(ApiKeyId::from(id), name, key);

        info!(
            id = %api_key.id(),
            name = %api_key.name(),
            key_prefix = %api_key.key_prefix(),
            "API key created"
        );

        Ok(api_key)
    }

    /// Find a key by identifier, name, or both
    ///
    /// Supplying neither is a caller error: an empty filter would match an
    /// arbitrary record.
    pub async fn find_api_key(
        &self,
        id: Option<&ApiKeyId>,
        name: Option<&str>,
    ) -> Result<Option<ApiKey>, DomainError> {
        let filter = build_filter([
            (ID_FIELD, id.map(ApiKeyId::as_str)),
            (NAME_FIELD, name),
        ]);

        if filter.is_empty() {
            return Err(ApiKeyValidationError::NoFilter("id or name").into());
        }

        debug!(id = ?id, name = ?name, "Finding API key");
        self.find_one(&filter).await
    }

    /// Return every key in store-native order
    pub async fn find_all_api_keys(&self) -> Result<Vec<ApiKey>, DomainError> {
        let documents = self.store.find_all().await?;
        debug!(count = documents.len(), "Listed API keys");

        documents.into_iter().map(ApiKey::try_from).collect()
    }

    /// Whether any stored record carries exactly this key value
    pub async fn has_api_key(&self, key: &str) -> Result<bool, DomainError> {
        if key.is_empty() {
            return Ok(false);
        }

        let filter = build_filter([(KEY_FIELD, Some(key))]);
        let found = self.store.find_one(&filter).await?.is_some();

        debug!(key_prefix = %key_prefix(key), found, "Checked API key");
        Ok(found)
    }

    /// Apply the supplied fields of `update` to the record with this identifier
    ///
    /// Returns the record as it is after the update, or `None` when no record
    /// has the identifier.
    pub async fn update_api_key(
        &self,
        id: &ApiKeyId,
        update: &ApiKeyUpdate,
    ) -> Result<Option<ApiKey>, DomainError> {
        update.validate(&self.policy)?;

        let filter = build_filter([(ID_FIELD, Some(id.as_str()))]);

        if update.is_empty() {
            debug!(id = %id, "Empty API key update, returning current record");
            return self.find_one(&filter).await;
        }

        let updated = self
            .store
            .find_one_and_update(&filter, &update.to_update())
            .await?
            .map(ApiKey::try_from)
            .transpose()?;

        match &updated {
            Some(api_key) => info!(
                id = %id,
                name_changed = update.name.is_some(),
                key_changed = update.key.is_some(),
                name = %api_key.name(),
                "API key updated"
            ),
            None => debug!(id = %id, "No API key to update"),
        }

        Ok(updated)
    }

    /// Delete at most one key matching every supplied field
    ///
    /// Returns the deleted record, or `None` when nothing matched.
    pub async fn delete_api_key(
        &self,
        id: Option<&ApiKeyId>,
        name: Option<&str>,
        key: Option<&str>,
    ) -> Result<Option<ApiKey>, DomainError> {
        let filter = build_filter([
            (ID_FIELD, id.map(ApiKeyId::as_str)),
            (NAME_FIELD, name),
            (KEY_FIELD, key),
        ]);

        if filter.is_empty() {
            return Err(ApiKeyValidationError::NoFilter("id, name or key").into());
        }

        let deleted = self
            .store
            .find_one_and_delete(&filter)
            .await?
            .map(ApiKey::try_from)
            .transpose()?;

        match &deleted {
            Some(api_key) => info!(id = %api_key.id(), name = %api_key.name(), "API key deleted"),
            None => debug!(id = ?id, name = ?name, "No API key to delete"),
        }

        Ok(deleted)
    }

    /// Verify the backing store is reachable
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.store.ping().await
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<ApiKey>, DomainError> {
        self.store
            .find_one(filter)
            .await?
            .map(ApiKey::try_from)
            .transpose()
    }
}
