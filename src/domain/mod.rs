//! Domain layer - Core business logic and entities

pub mod api_key;
pub mod document;
pub mod error;

pub use api_key::{ApiKey, ApiKeyId, ApiKeyUpdate, ApiKeyValidationError, KeyPolicy};
pub use document::{build_filter, DocumentStore, Fields, Filter, StoredDocument, Update};
pub use error::DomainError;
