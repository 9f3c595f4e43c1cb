//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DocumentStore` port from the `core` crate. Documents of every
//! collection are kept in a single PostgreSQL table as JSONB, accessed with `sqlx`.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;
use vetcare_core::domain::{Collection, Document, StoredDocument};
use vetcare_core::ports::{DocumentStore, StorageError, StorageResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DocumentStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Struct
//=========================================================================================

#[derive(FromRow)]
struct DocumentRecord {
    id: Uuid,
    data: Json<Document>,
}
impl DocumentRecord {
    fn to_domain(self) -> StoredDocument {
        StoredDocument::new(self.id, self.data.0)
    }
}

fn map_sqlx_error(collection: Collection, e: sqlx::Error) -> StorageError {
    match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            warn!("Unique constraint rejected a write to '{}'", collection);
            StorageError::Duplicate(db_err.message().to_string())
        }
        other => StorageError::Unavailable(other.to_string()),
    }
}

//=========================================================================================
// `DocumentStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentStore for DbAdapter {
    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> StorageResult<StoredDocument> {
        let record = sqlx::query_as::<_, DocumentRecord>(
            "INSERT INTO documents (id, collection, data) VALUES ($1, $2, $3) RETURNING id, data",
        )
        .bind(Uuid::new_v4())
        .bind(collection.as_str())
        .bind(Json(document))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(collection, e))?;

        Ok(record.to_domain())
    }

    async fn query(
        &self,
        collection: Collection,
        filter: &Document,
        limit: usize,
    ) -> StorageResult<Vec<StoredDocument>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let records = sqlx::query_as::<_, DocumentRecord>(
            "SELECT id, data FROM documents WHERE collection = $1 AND data @> $2 LIMIT $3",
        )
        .bind(collection.as_str())
        .bind(Json(filter))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(collection, e))?;

        let documents = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(documents)
    }
}
