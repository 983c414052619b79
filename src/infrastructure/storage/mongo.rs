//! MongoDB document store
//!
//! The record id is the collection's `_id` ObjectId, exposed as its hex string.
//! An id that is not a valid ObjectId cannot match any record.

use std::time::Duration;

use bson::{doc, oid::ObjectId, Bson, Document};
use futures::TryStreamExt;
use mongodb::{
    options::{ClientOptions, ReturnDocument},
    Client, Collection,
};
use serde_json::Value;
use tracing::info;

use async_trait::async_trait;

use crate::domain::document::{DocumentStore, Fields, Filter, StoredDocument, Update, ID_FIELD};
use crate::domain::DomainError;

const MONGO_ID_FIELD: &str = "_id";
const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// MongoDB store configuration
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// Connection URI
    pub uri: String,
    /// Database name
    pub database: String,
    /// Collection holding the records
    pub collection: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "splatpal".to_string(),
            collection: "api_keys".to_string(),
        }
    }
}

impl MongoConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }
}

/// MongoDB-backed document store
#[derive(Debug, Clone)]
pub struct MongoDocumentStore {
    client: Client,
    database: String,
    collection: Collection<Document>,
}

impl MongoDocumentStore {
    /// Connects to MongoDB and verifies the connection with a ping
    pub async fn connect(config: &MongoConfig) -> Result<Self, DomainError> {
        info!(database = %config.database, collection = %config.collection, "Connecting to MongoDB");

        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| store_error("Invalid MongoDB URI", e))?;
        apply_default_timeouts(&mut options);

        let client = Client::with_options(options)
            .map_err(|e| store_error("Failed to connect to MongoDB", e))?;

        let store = Self {
            collection: client
                .database(&config.database)
                .collection::<Document>(&config.collection),
            database: config.database.clone(),
            client,
        };
        store.ping().await?;

        info!(database = %config.database, "Connected to MongoDB");
        Ok(store)
    }
}

/// Bounds server selection so an unreachable server fails fast.
/// Timeouts already set in the URI are kept.
fn apply_default_timeouts(options: &mut ClientOptions) {
    options.server_selection_timeout.get_or_insert(DEFAULT_TIMEOUT);
    options.connect_timeout.get_or_insert(DEFAULT_TIMEOUT);
}

fn store_error(context: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::store_unavailable(format!("{}: {}", context, e))
}

fn to_bson(value: &Value) -> Result<Bson, DomainError> {
    bson::to_bson(value).map_err(|e| store_error("Failed to encode value", e))
}

/// Translates a filter into a query document
///
/// Returns `None` when the filter names an id that is not an ObjectId.
fn filter_to_document(filter: &Filter) -> Result<Option<Document>, DomainError> {
    let mut query = Document::new();

    for (field, value) in filter.iter() {
        if field == ID_FIELD {
            let Some(oid) = value.as_str().and_then(|id| ObjectId::parse_str(id).ok()) else {
                return Ok(None);
            };
            query.insert(MONGO_ID_FIELD, oid);
        } else {
            query.insert(field, to_bson(value)?);
        }
    }

    Ok(Some(query))
}

fn update_to_document(update: &Update) -> Result<Document, DomainError> {
    let mut set = Document::new();

    for (field, value) in update.iter() {
        if field != ID_FIELD && field != MONGO_ID_FIELD {
            set.insert(field, to_bson(value)?);
        }
    }

    Ok(doc! { "$set": set })
}

fn fields_to_document(mut fields: Fields) -> Result<Document, DomainError> {
    fields.remove(ID_FIELD);
    fields.remove(MONGO_ID_FIELD);

    bson::to_document(&fields).map_err(|e| store_error("Failed to encode record", e))
}

fn document_to_stored(mut document: Document) -> Result<StoredDocument, DomainError> {
    let id = match document.remove(MONGO_ID_FIELD) {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(id)) => id,
        Some(other) => other.to_string(),
        None => return Err(DomainError::store_unavailable("Record has no _id")),
    };

    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(fields) => Ok(StoredDocument::new(id, fields)),
        other => Err(DomainError::store_unavailable(format!(
            "Record '{}' is not an object: {}",
            id, other
        ))),
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn insert(&self, fields: Fields) -> Result<String, DomainError> {
        let document = fields_to_document(fields)?;

        let result = self
            .collection
            .insert_one(document)
            .await
            .map_err(|e| store_error("Insert failed", e))?;

        result
            .inserted_id
            .as_object_id()
            .map(|oid| oid.to_hex())
            .ok_or_else(|| DomainError::store_unavailable("Failed to get inserted ID"))
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<StoredDocument>, DomainError> {
        let Some(query) = filter_to_document(filter)? else {
            return Ok(None);
        };

        self.collection
            .find_one(query)
            .await
            .map_err(|e| store_error("Find failed", e))?
            .map(document_to_stored)
            .transpose()
    }

    async fn find_all(&self) -> Result<Vec<StoredDocument>, DomainError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await
            .map_err(|e| store_error("Find failed", e))?;

        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| store_error("Failed to read records", e))?;

        documents.into_iter().map(document_to_stored).collect()
    }

    async fn find_one_and_delete(
        &self,
        filter: &Filter,
    ) -> Result<Option<StoredDocument>, DomainError> {
        let Some(query) = filter_to_document(filter)? else {
            return Ok(None);
        };

        self.collection
            .find_one_and_delete(query)
            .await
            .map_err(|e| store_error("Delete failed", e))?
            .map(document_to_stored)
            .transpose()
    }

    async fn find_one_and_update(
        &self,
        filter: &Filter,
        update: &Update,
    ) -> Result<Option<StoredDocument>, DomainError> {
        let Some(query) = filter_to_document(filter)? else {
            return Ok(None);
        };

        let modifications = update_to_document(update)?;
        if modifications.get_document("$set").map_or(true, |set| set.is_empty()) {
            return self.find_one(filter).await;
        }

        self.collection
            .find_one_and_update(query, modifications)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| store_error("Update failed", e))?
            .map(document_to_stored)
            .transpose()
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| store_error("MongoDB ping failed", e))?;

        Ok(())
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}
