//! services/api/src/web/extract.rs
//!
//! Request extractors that run the schema validator before a handler sees
//! the body.

use crate::error::ApiError;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde_json::Value;
use vetcare_core::schema::{RequestSchema, ValidationError};

/// A JSON body that has already passed its schema.
///
/// Malformed JSON, a wrong content type, and broken field rules are all
/// rejected with `ApiError::Validation`.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: RequestSchema,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ValidationError::single("body", rejection.body_text()))?;
        let record = T::from_body(body)?;
        Ok(Self(record))
    }
}
