//! crates/vetcare_core/src/ports.rs
//!
//! Defines the contract of the storage collaborator. Handlers only ever talk
//! to this trait, so the concrete store (Postgres, in-memory, a test double)
//! is chosen at startup and injected.

use async_trait::async_trait;

use crate::domain::{Collection, Document, StoredDocument};

/// Failures reported by a document store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The write would break a uniqueness constraint enforced by the store.
    #[error("Duplicate document: {0}")]
    Duplicate(String),
    /// Connectivity, timeout, or any other failure at the storage tier.
    #[error("{0}")]
    Unavailable(String),
}

/// A convenience type alias for `Result<T, StorageError>`.
pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists `document` in `collection` and returns it with its new id.
    async fn insert(&self, collection: Collection, document: Document)
        -> StorageResult<StoredDocument>;

    /// Returns at most `limit` documents of `collection` whose fields equal
    /// every entry of `filter`. An empty filter matches all documents.
    /// Order is whatever the store natively yields.
    async fn query(
        &self,
        collection: Collection,
        filter: &Document,
        limit: usize,
    ) -> StorageResult<Vec<StoredDocument>>;
}
