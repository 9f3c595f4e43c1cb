//! crates/vetcare_core/src/domain.rs
//!
//! Defines the core records of the clinic backend and the generic document
//! shape exchanged with the storage collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

use crate::schema::QuestionRequest;

/// A schema-flexible record as handed to the document store.
pub type Document = Map<String, Value>;

/// A document after it has been persisted, carrying its store-assigned id.
///
/// Serializes flat: `{"id": "...", "name": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: Document,
}

impl StoredDocument {
    pub fn new(id: Uuid, fields: Document) -> Self {
        Self { id, fields }
    }

    /// Returns true when every key/value pair of `filter` is present in this document.
    pub fn matches(&self, filter: &Document) -> bool {
        filter
            .iter()
            .all(|(key, expected)| self.fields.get(key) == Some(expected))
    }
}

/// The named collections this service writes to and reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Appointment,
    Newsletter,
    Question,
    /// Only ever read, by the storage connectivity probe.
    Healthcheck,
}

impl Collection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Collection::Appointment => "appointment",
            Collection::Newsletter => "newsletter",
            Collection::Question => "question",
            Collection::Healthcheck => "healthcheck",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer question, stamped with the time the service received it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionTicket {
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl QuestionTicket {
    pub fn received(request: QuestionRequest, now: DateTime<Utc>) -> Self {
        Self {
            name: request.name,
            email: request.email,
            message: request.message,
            created_at: now,
        }
    }
}

/// Converts a record into the untyped document form stored by the collaborator.
pub fn to_document<T: Serialize>(record: &T) -> Result<Document, serde_json::Error> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields),
        other => Err(serde::ser::Error::custom(format!(
            "expected a record to serialize as an object, got {other}"
        ))),
    }
}
