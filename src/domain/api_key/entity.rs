//! API Key entity and related types

use serde::{Deserialize, Serialize};

use crate::domain::document::{Fields, StoredDocument};
use crate::domain::DomainError;

/// Persisted field holding the human-readable label
pub const NAME_FIELD: &str = "name";

/// Persisted field holding the secret token
pub const KEY_FIELD: &str = "key";

/// Opaque identifier assigned by the document store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKeyId(String);

impl ApiKeyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ApiKeyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ApiKeyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<ApiKeyId> for String {
    fn from(id: ApiKeyId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// API Key record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    /// Identifier assigned by the store
    id: ApiKeyId,
    /// Display name for the key, not unique
    name: String,
    /// The secret token
    key: String,
}

impl ApiKey {
    pub fn new(id: ApiKeyId, name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            key: key.into(),
        }
    }

    pub fn id(&self) -> &ApiKeyId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Leading characters of the secret, safe to log
    pub fn key_prefix(&self) -> &str {
        key_prefix(&self.key)
    }

    /// Fields persisted for a new record
    pub fn new_fields(name: &str, key: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert(NAME_FIELD.to_string(), name.into());
        fields.insert(KEY_FIELD.to_string(), key.into());
        fields
    }
}

impl TryFrom<StoredDocument> for ApiKey {
    type Error = DomainError;

    fn try_from(document: StoredDocument) -> Result<Self, Self::Error> {
        let name = document.get_str(NAME_FIELD).ok_or_else(|| {
            DomainError::store_unavailable(format!(
                "Record '{}' has no string '{}' field",
                document.id, NAME_FIELD
            ))
        })?;
        let key = document.get_str(KEY_FIELD).ok_or_else(|| {
            DomainError::store_unavailable(format!(
                "Record '{}' has no string '{}' field",
                document.id, KEY_FIELD
            ))
        })?;

        Ok(Self::new(ApiKeyId::new(&document.id), name, key))
    }
}

/// First eight characters of a token, for log lines
pub fn key_prefix(key: &str) -> &str {
    match key.char_indices().nth(8) {
        Some((end, _)) => &key[..end],
        None => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_key_from_document() {
        let document = StoredDocument::new("abc123", ApiKey::new_fields("alpha", "secret"));
        let key = ApiKey::try_from(document).unwrap();

        assert_eq!(key.id().as_str(), "abc123");
        assert_eq!(key.name(), "alpha");
        assert_eq!(key.key(), "secret");
    }

    #[test]
    fn test_api_key_from_document_missing_key() {
        let mut fields = Fields::new();
        fields.insert(NAME_FIELD.to_string(), json!("alpha"));
        let document = StoredDocument::new("abc123", fields);

        let result = ApiKey::try_from(document);
        assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
    }

    #[test]
    fn test_api_key_from_document_non_string_name() {
        let mut fields = ApiKey::new_fields("alpha", "secret");
        fields.insert(NAME_FIELD.to_string(), json!(42));

        let result = ApiKey::try_from(StoredDocument::new("abc123", fields));
        assert!(result.is_err());
    }

    #[test]
    fn test_api_key_serialization() {
        let key = ApiKey::new(ApiKeyId::new("abc123"), "alpha", "secret");
        let json = serde_json::to_value(&key).unwrap();

        assert_eq!(json, json!({"id": "abc123", "name": "alpha", "key": "secret"}));
    }

    #[test]
    fn test_key_prefix() {
        assert_eq!(key_prefix("abcdefghijkl"), "abcdefgh");
        assert_eq!(key_prefix("short"), "short");
        assert_eq!(key_prefix(""), "");
    }
}
