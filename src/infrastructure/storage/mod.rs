//! Storage infrastructure - Document store implementations

mod factory;
mod in_memory;
mod mongo;
mod postgres;

pub use factory::{StoreConfig, StoreFactory, StoreType};
pub use in_memory::InMemoryDocumentStore;
pub use mongo::{MongoConfig, MongoDocumentStore};
pub use postgres::{PostgresConfig, PostgresDocumentStore};
