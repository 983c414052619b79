//! API Key infrastructure implementations
//!
//! This module provides key generation and the registry that issues,
//! looks up, updates and revokes keys through a document store.

mod generator;
mod registry;

pub use generator::ApiKeyGenerator;
pub use registry::ApiKeyRegistry;
