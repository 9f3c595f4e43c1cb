//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `DocumentStore` port. Used when no
//! database is configured, and as the store behind the integration tests.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;
use vetcare_core::domain::{Collection, Document, StoredDocument};
use vetcare_core::ports::{DocumentStore, StorageError, StorageResult};

/// Keeps every collection as an insertion-ordered `Vec` behind one lock.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<StoredDocument>>>,
    unique_fields: Vec<(Collection, String)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects inserts into `collection` whose `field` value is already stored.
    pub fn with_unique_field(mut self, collection: Collection, field: impl Into<String>) -> Self {
        self.unique_fields.push((collection, field.into()));
        self
    }

    /// Total number of documents held in `collection`.
    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> StorageResult<StoredDocument> {
        // The constraint check and the push happen under the same write lock.
        let mut collections = self.collections.write().await;
        let stored = collections.entry(collection).or_default();

        for (unique_collection, field) in &self.unique_fields {
            if *unique_collection != collection {
                continue;
            }
            if let Some(value) = document.get(field) {
                if stored.iter().any(|doc| doc.fields.get(field) == Some(value)) {
                    return Err(StorageError::Duplicate(format!(
                        "{collection}.{field} already holds {value}"
                    )));
                }
            }
        }

        let doc = StoredDocument::new(Uuid::new_v4(), document);
        stored.push(doc.clone());
        Ok(doc)
    }

    async fn query(
        &self,
        collection: Collection,
        filter: &Document,
        limit: usize,
    ) -> StorageResult<Vec<StoredDocument>> {
        let collections = self.collections.read().await;
        let documents: Vec<StoredDocument> = collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| doc.matches(filter))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(documents)
    }
}
