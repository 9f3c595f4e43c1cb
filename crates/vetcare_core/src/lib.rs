pub mod domain;
pub mod ports;
pub mod schema;

pub use domain::{to_document, Collection, Document, QuestionTicket, StoredDocument};
pub use ports::{DocumentStore, StorageError, StorageResult};
pub use schema::{
    validate_appointment, validate_question, validate_subscription, AppointmentRequest,
    FieldViolation, NewsletterSubscription, QuestionRequest, RequestSchema, ValidationError,
};
