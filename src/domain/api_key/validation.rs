//! API Key validation utilities

use serde::Deserialize;
use thiserror::Error;

use crate::domain::DomainError;

/// Length of generated keys unless configured otherwise
pub const DEFAULT_KEY_LENGTH: usize = 30;

/// Errors that can occur during API key validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiKeyValidationError {
    #[error("API key name cannot be empty")]
    EmptyName,

    #[error("API key value cannot be empty")]
    EmptyKey,

    #[error("API key value must be exactly {expected} characters, got {actual}")]
    KeyLength { expected: usize, actual: usize },

    #[error("At least one of {0} must be supplied")]
    NoFilter(&'static str),

    #[error("Generated key length must be at least 1")]
    ZeroLength,
}

impl From<ApiKeyValidationError> for DomainError {
    fn from(err: ApiKeyValidationError) -> Self {
        DomainError::invalid_argument(err.to_string())
    }
}

/// Length rules for key values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyPolicy {
    /// Length of generated keys
    pub length: usize,
    /// Whether caller-supplied keys must have exactly `length` characters
    pub enforce_length: bool,
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self {
            length: DEFAULT_KEY_LENGTH,
            enforce_length: false,
        }
    }
}

impl KeyPolicy {
    /// Policy requiring supplied keys to have exactly `length` characters
    pub fn fixed(length: usize) -> Self {
        Self {
            length,
            enforce_length: true,
        }
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Checks the policy itself; a zero length would generate empty keys
    pub fn validate(&self) -> Result<(), ApiKeyValidationError> {
        if self.length == 0 {
            return Err(ApiKeyValidationError::ZeroLength);
        }

        Ok(())
    }

    /// Validate a caller-supplied key value
    pub fn validate_key(&self, key: &str) -> Result<(), ApiKeyValidationError> {
        if key.is_empty() {
            return Err(ApiKeyValidationError::EmptyKey);
        }

        let actual = key.chars().count();

        if self.enforce_length && actual != self.length {
            return Err(ApiKeyValidationError::KeyLength {
                expected: self.length,
                actual,
            });
        }

        Ok(())
    }
}

/// Validate an API key name
///
/// Whitespace-only names count as empty.
pub fn validate_name(name: &str) -> Result<(), ApiKeyValidationError> {
    if name.trim().is_empty() {
        return Err(ApiKeyValidationError::EmptyName);
    }

    Ok(())
}
