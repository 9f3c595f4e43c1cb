//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the clinic's REST endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::ApiError;
use crate::web::extract::ValidatedJson;
use crate::web::health::{self, ServiceStatus, StorageCheck};
use crate::web::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{IntoParams, OpenApi, ToSchema};
use vetcare_core::domain::{to_document, Collection, Document, QuestionTicket, StoredDocument};
use vetcare_core::ports::StorageError;
use vetcare_core::schema::{
    AppointmentRequest, NewsletterSubscription, QuestionRequest, ValidationError,
};

/// Page size of `GET /appointments` when no `limit` is given.
pub const DEFAULT_LIST_LIMIT: usize = 50;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    info(title = "VetCare API"),
    paths(
        health::root_handler,
        health::storage_check_handler,
        create_appointment_handler,
        list_appointments_handler,
        subscribe_newsletter_handler,
        ask_question_handler,
    ),
    components(
        schemas(
            ServiceStatus,
            StorageCheck,
            AppointmentCreated,
            AppointmentList,
            NewsletterResponse,
            QuestionReceived,
        )
    ),
    tags(
        (name = "VetCare API", description = "Appointment requests, newsletter sign-ups and questions from the clinic website.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Query Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct AppointmentCreated {
    message: String,
    #[schema(value_type = Object)]
    appointment: StoredDocument,
}

#[derive(Serialize, ToSchema)]
pub struct AppointmentList {
    #[schema(value_type = Vec<Object>)]
    items: Vec<StoredDocument>,
}

/// `subscriber` is omitted when the address was already on the list.
#[derive(Serialize, ToSchema)]
pub struct NewsletterResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    subscriber: Option<StoredDocument>,
}

impl NewsletterResponse {
    fn subscribed(subscriber: StoredDocument) -> Self {
        Self {
            message: "Subscribed".to_string(),
            subscriber: Some(subscriber),
        }
    }

    fn already_subscribed() -> Self {
        Self {
            message: "Already subscribed".to_string(),
            subscriber: None,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct QuestionReceived {
    message: String,
    #[schema(value_type = Object)]
    ticket: StoredDocument,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Maximum number of appointments to return (default 50).
    limit: Option<usize>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Record an appointment request.
#[utoipa::path(
    post,
    path = "/appointments",
    request_body(content_type = "application/json", description = "Owner, pet and preferred slot."),
    responses(
        (status = 200, description = "Appointment stored", body = AppointmentCreated),
        (status = 422, description = "The request body failed validation"),
        (status = 500, description = "Storage error")
    )
)]
pub async fn create_appointment_handler(
    State(app_state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<AppointmentRequest>,
) -> Result<Json<AppointmentCreated>, ApiError> {
    let document = to_document(&request)?;
    let appointment = app_state
        .store
        .insert(Collection::Appointment, document)
        .await
        .map_err(|e| {
            error!("Failed to store appointment: {:?}", e);
            ApiError::from(e)
        })?;

    info!("Appointment {} requested for {}", appointment.id, request.preferred_date);
    Ok(Json(AppointmentCreated {
        message: "Appointment requested".to_string(),
        appointment,
    }))
}

/// List stored appointment requests, in storage order.
#[utoipa::path(
    get,
    path = "/appointments",
    params(ListParams),
    responses(
        (status = 200, description = "Up to `limit` appointments", body = AppointmentList),
        (status = 422, description = "Invalid limit"),
        (status = 500, description = "Storage error")
    )
)]
pub async fn list_appointments_handler(
    State(app_state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<AppointmentList>, ApiError> {
    let Query(params) =
        params.map_err(|rejection| ValidationError::single("limit", rejection.body_text()))?;
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if limit == 0 {
        return Ok(Json(AppointmentList { items: Vec::new() }));
    }

    let items = app_state
        .store
        .query(Collection::Appointment, &Document::new(), limit)
        .await
        .map_err(|e| {
            error!("Failed to list appointments: {:?}", e);
            ApiError::from(e)
        })?;

    Ok(Json(AppointmentList { items }))
}

/// Add an address to the newsletter, once.
///
/// The existence check is a fast path; a uniqueness constraint in the store
/// settles concurrent sign-ups for the same address.
#[utoipa::path(
    post,
    path = "/newsletter",
    request_body(content_type = "application/json", description = "The address to subscribe."),
    responses(
        (status = 200, description = "Subscribed, or already subscribed", body = NewsletterResponse),
        (status = 422, description = "The request body failed validation"),
        (status = 500, description = "Storage error")
    )
)]
pub async fn subscribe_newsletter_handler(
    State(app_state): State<Arc<AppState>>,
    ValidatedJson(subscription): ValidatedJson<NewsletterSubscription>,
) -> Result<Json<NewsletterResponse>, ApiError> {
    let document = to_document(&subscription)?;
    let store = &app_state.store;

    let existing = store
        .query(Collection::Newsletter, &document, 1)
        .await
        .map_err(|e| {
            error!("Failed to look up subscriber: {:?}", e);
            ApiError::from(e)
        })?;
    if !existing.is_empty() {
        return Ok(Json(NewsletterResponse::already_subscribed()));
    }

    match store.insert(Collection::Newsletter, document).await {
        Ok(subscriber) => {
            info!("New newsletter subscriber {}", subscriber.id);
            Ok(Json(NewsletterResponse::subscribed(subscriber)))
        }
        Err(StorageError::Duplicate(_)) => Ok(Json(NewsletterResponse::already_subscribed())),
        Err(e) => {
            error!("Failed to store subscriber: {:?}", e);
            Err(e.into())
        }
    }
}

/// Open a ticket for a customer question.
#[utoipa::path(
    post,
    path = "/questions",
    request_body(content_type = "application/json", description = "Name, email and message."),
    responses(
        (status = 200, description = "Question stored", body = QuestionReceived),
        (status = 422, description = "The request body failed validation"),
        (status = 500, description = "Storage error")
    )
)]
pub async fn ask_question_handler(
    State(app_state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<QuestionRequest>,
) -> Result<Json<QuestionReceived>, ApiError> {
    let ticket = QuestionTicket::received(request, Utc::now());
    let document = to_document(&ticket)?;
    let ticket = app_state
        .store
        .insert(Collection::Question, document)
        .await
        .map_err(|e| {
            error!("Failed to store question: {:?}", e);
            ApiError::from(e)
        })?;

    info!("Question ticket {} opened", ticket.id);
    Ok(Json(QuestionReceived {
        message: "We received your question".to_string(),
        ticket,
    }))
}
