//! API Key domain
//!
//! This module provides the API key record, its partial update structure
//! and the validation rules applied before anything reaches the store.

mod entity;
mod update;
mod validation;

pub use entity::{key_prefix, ApiKey, ApiKeyId, KEY_FIELD, NAME_FIELD};
pub use update::ApiKeyUpdate;
pub use validation::{validate_name, ApiKeyValidationError, KeyPolicy, DEFAULT_KEY_LENGTH};
