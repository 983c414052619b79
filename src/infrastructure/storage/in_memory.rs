//! In-memory document store implementation

use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::document::{DocumentStore, Fields, Filter, StoredDocument, Update, ID_FIELD};
use crate::domain::DomainError;

/// Thread-safe in-memory document store
///
/// Useful for testing and development. Data is lost when the process terminates.
/// Records are kept in insertion order, which is the order `find_all` returns.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Vec<StoredDocument>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with documents
    pub fn with_documents(documents: Vec<StoredDocument>) -> Self {
        Self {
            documents: RwLock::new(documents),
        }
    }

    fn lock_error(e: impl std::fmt::Display) -> DomainError {
        DomainError::store_unavailable(format!("Failed to acquire lock: {}", e))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(&self, mut fields: Fields) -> Result<String, DomainError> {
        fields.remove(ID_FIELD);
        let id = Uuid::new_v4().to_string();

        let mut documents = self.documents.write().map_err(Self::lock_error)?;
        documents.push(StoredDocument::new(id.clone(), fields));

        Ok(id)
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<StoredDocument>, DomainError> {
        let documents = self.documents.read().map_err(Self::lock_error)?;

        Ok(documents.iter().find(|doc| filter.matches(doc)).cloned())
    }

    async fn find_all(&self) -> Result<Vec<StoredDocument>, DomainError> {
        let documents = self.documents.read().map_err(Self::lock_error)?;

        Ok(documents.clone())
    }

    async fn find_one_and_delete(
        &self,
        filter: &Filter,
    ) -> Result<Option<StoredDocument>, DomainError> {
        let mut documents = self.documents.write().map_err(Self::lock_error)?;

        Ok(documents
            .iter()
            .position(|doc| filter.matches(doc))
            .map(|index| documents.remove(index)))
    }

    async fn find_one_and_update(
        &self,
        filter: &Filter,
        update: &Update,
    ) -> Result<Option<StoredDocument>, DomainError> {
        let mut documents = self.documents.write().map_err(Self::lock_error)?;

        let Some(document) = documents.iter_mut().find(|doc| filter.matches(doc)) else {
            return Ok(None);
        };

        update.apply(&mut document.fields);
        document.fields.remove(ID_FIELD);

        Ok(Some(document.clone()))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let _documents = self.documents.read().map_err(Self::lock_error)?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
