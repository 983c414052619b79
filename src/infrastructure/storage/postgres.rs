//! PostgreSQL document store with connection pooling
//!
//! Records live in a table of `(id, data JSONB)` rows. Field filters use JSONB
//! containment and the find-and-modify operations lock the selected row, so
//! concurrent deletes or updates of the same record cannot both succeed.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

use crate::domain::document::{DocumentStore, Fields, Filter, StoredDocument, Update, ID_FIELD};
use crate::domain::DomainError;

/// PostgreSQL store configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Table holding the records
    pub table: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection acquire timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/splatpal".to_string(),
            table: "api_keys".to_string(),
            max_connections: 10,
            connect_timeout_secs: 5,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }
}

/// PostgreSQL-backed document store
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
    table: String,
}

impl PostgresDocumentStore {
    /// Creates a store over an existing pool
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self, DomainError> {
        let table = table.into();
        validate_table_name(&table)?;

        Ok(Self { pool, table })
    }

    /// Connects a new pool and ensures the table exists
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        validate_table_name(&config.table)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| store_error("Failed to connect to PostgreSQL", e))?;

        let store = Self::new(pool, config.table.clone())?;
        store.ensure_table().await?;

        Ok(store)
    }

    /// Ensures the record table exists
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id VARCHAR(64) PRIMARY KEY,
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to create table", e))?;

        Ok(())
    }
}

/// Bind parameters for a filter: JSONB containment document and optional id
struct FilterParams {
    data: Value,
    id: Option<String>,
}

impl FilterParams {
    /// `None` when the filter can match nothing, e.g. a non-string id
    fn from_filter(filter: &Filter) -> Option<Self> {
        let id = match filter.id() {
            Some(Value::String(id)) => Some(id.clone()),
            Some(_) => return None,
            None => None,
        };

        Some(Self {
            data: Value::Object(filter.field_map()),
            id,
        })
    }
}

/// Subquery selecting the id of the first row matching a filter
///
/// `$1` is the containment document and `$2` the id when `with_id` is set.
fn select_id_sql(table: &str, with_id: bool, lock: bool) -> String {
    let mut sql = format!("SELECT id FROM {} WHERE data @> $1", table);

    if with_id {
        sql.push_str(" AND id = $2");
    }

    sql.push_str(" ORDER BY created_at, id LIMIT 1");

    if lock {
        sql.push_str(" FOR UPDATE");
    }

    sql
}

fn find_one_sql(table: &str, with_id: bool) -> String {
    format!(
        "SELECT id, data FROM {} WHERE id = ({})",
        table,
        select_id_sql(table, with_id, false)
    )
}

fn delete_one_sql(table: &str, with_id: bool) -> String {
    format!(
        "DELETE FROM {} WHERE id = ({}) RETURNING id, data",
        table,
        select_id_sql(table, with_id, true)
    )
}

fn update_one_sql(table: &str, with_id: bool) -> String {
    let update_param = if with_id { 3 } else { 2 };

    format!(
        "UPDATE {} SET data = data || ${}, updated_at = NOW() WHERE id = ({}) RETURNING id, data",
        table,
        update_param,
        select_id_sql(table, with_id, true)
    )
}

fn validate_table_name(table: &str) -> Result<(), DomainError> {
    let valid = !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !table.starts_with(|c: char| c.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(DomainError::invalid_argument(format!(
            "Invalid table name '{}'",
            table
        )))
    }
}

fn store_error(context: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::store_unavailable(format!("{}: {}", context, e))
}

fn row_to_document(row: &PgRow) -> Result<StoredDocument, DomainError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| store_error("Failed to read id", e))?;
    let data: Value = row
        .try_get("data")
        .map_err(|e| store_error("Failed to read data", e))?;

    match data {
        Value::Object(fields) => Ok(StoredDocument::new(id, fields)),
        other => Err(DomainError::store_unavailable(format!(
            "Record '{}' data is not an object: {}",
            id, other
        ))),
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn insert(&self, mut fields: Fields) -> Result<String, DomainError> {
        fields.remove(ID_FIELD);
        let id = Uuid::new_v4().to_string();
        let query = format!("INSERT INTO {} (id, data) VALUES ($1, $2)", self.table);

        sqlx::query(&query)
            .bind(&id)
            .bind(Value::Object(fields))
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to insert record", e))?;

        Ok(id)
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<StoredDocument>, DomainError> {
        let Some(params) = FilterParams::from_filter(filter) else {
            return Ok(None);
        };
        let query = find_one_sql(&self.table, params.id.is_some());

        let mut statement = sqlx::query(&query).bind(params.data);
        if let Some(id) = params.id {
            statement = statement.bind(id);
        }

        let row = statement
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to find record", e))?;

        row.as_ref().map(row_to_document).transpose()
    }

    async fn find_all(&self) -> Result<Vec<StoredDocument>, DomainError> {
        let query = format!(
            "SELECT id, data FROM {} ORDER BY created_at, id",
            self.table
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("Failed to list records", e))?;

        rows.iter().map(row_to_document).collect()
    }

    async fn find_one_and_delete(
        &self,
        filter: &Filter,
    ) -> Result<Option<StoredDocument>, DomainError> {
        let Some(params) = FilterParams::from_filter(filter) else {
            return Ok(None);
        };
        let query = delete_one_sql(&self.table, params.id.is_some());

        let mut statement = sqlx::query(&query).bind(params.data);
        if let Some(id) = params.id {
            statement = statement.bind(id);
        }

        let row = statement
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to delete record", e))?;

        row.as_ref().map(row_to_document).transpose()
    }

    async fn find_one_and_update(
        &self,
        filter: &Filter,
        update: &Update,
    ) -> Result<Option<StoredDocument>, DomainError> {
        if update.is_empty() {
            return self.find_one(filter).await;
        }

        let Some(params) = FilterParams::from_filter(filter) else {
            return Ok(None);
        };
        let query = update_one_sql(&self.table, params.id.is_some());

        let mut set = update.field_map();
        set.remove(ID_FIELD);

        let mut statement = sqlx::query(&query).bind(params.data);
        if let Some(id) = params.id {
            statement = statement.bind(id);
        }
        statement = statement.bind(Value::Object(set));

        let row = statement
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to update record", e))?;

        row.as_ref().map(row_to_document).transpose()
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("PostgreSQL ping failed", e))?;

        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
