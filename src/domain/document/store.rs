//! Document store capability trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::filter::{Fields, Filter, StoredDocument, Update};
use crate::domain::DomainError;

/// CRUD capability over one collection of schemaless records
///
/// Implementations map driver failures to `DomainError::StoreUnavailable`.
/// A filter on the identifier whose value is not a valid identifier for the
/// backend matches nothing.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new record and return the identifier assigned to it
    async fn insert(&self, fields: Fields) -> Result<String, DomainError>;

    /// Find the first record matching every condition of the filter
    async fn find_one(&self, filter: &Filter) -> Result<Option<StoredDocument>, DomainError>;

    /// Return every record in store-native order
    async fn find_all(&self) -> Result<Vec<StoredDocument>, DomainError>;

    /// Atomically remove the first matching record and return its snapshot
    async fn find_one_and_delete(
        &self,
        filter: &Filter,
    ) -> Result<Option<StoredDocument>, DomainError>;

    /// Atomically apply an update to the first matching record and return it
    /// as it is after the update
    async fn find_one_and_update(
        &self,
        filter: &Filter,
        update: &Update,
    ) -> Result<Option<StoredDocument>, DomainError>;

    /// Verify the store is reachable
    async fn ping(&self) -> Result<(), DomainError>;

    /// Short backend name for logs and health reports
    fn backend(&self) -> &'static str;
}
