//! Document store domain - capability interface consumed by the key registry

mod filter;
mod store;

pub use filter::{build_filter, Fields, Filter, StoredDocument, Update, ID_FIELD};
pub use store::DocumentStore;

#[cfg(test)]
pub use store::MockDocumentStore;
