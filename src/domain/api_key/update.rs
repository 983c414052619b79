//! Partial update of an API key record

use serde::Deserialize;

use super::entity::{KEY_FIELD, NAME_FIELD};
use super::validation::{validate_name, ApiKeyValidationError, KeyPolicy};
use crate::domain::document::Update;

/// Fields a caller intends to change; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiKeyUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

impl ApiKeyUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Whether no field was supplied
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.key.is_none()
    }

    /// Check every supplied field
    pub fn validate(&self, policy: &KeyPolicy) -> Result<(), ApiKeyValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }

        if let Some(key) = &self.key {
            policy.validate_key(key)?;
        }

        Ok(())
    }

    /// Store update touching only the supplied fields
    pub fn to_update(&self) -> Update {
        let mut update = Update::new();

        if let Some(name) = &self.name {
            update = update.set(NAME_FIELD, name.as_str());
        }

        if let Some(key) = &self.key {
            update = update.set(KEY_FIELD, key.as_str());
        }

        update
    }
}
