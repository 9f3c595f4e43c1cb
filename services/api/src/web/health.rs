//! services/api/src/web/health.rs
//!
//! Liveness endpoints. Neither of them ever answers with an error status.

use crate::web::state::AppState;
use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;
use vetcare_core::domain::{Collection, Document};

pub const SERVICE_NAME: &str = "VetCare API";

#[derive(Serialize, ToSchema)]
pub struct ServiceStatus {
    status: String,
    service: String,
}

/// Result of the storage probe. `error` is only present when `ok` is false.
#[derive(Serialize, ToSchema)]
pub struct StorageCheck {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Report that the service is up.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is running", body = ServiceStatus))
)]
pub async fn root_handler() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// Probe the document store with a one-document read.
///
/// Failures are reported inside the payload so that probes never trip
/// error-rate alerting.
#[utoipa::path(
    get,
    path = "/test",
    responses((status = 200, description = "Storage probe result", body = StorageCheck))
)]
pub async fn storage_check_handler(State(app_state): State<Arc<AppState>>) -> Json<StorageCheck> {
    let check = match app_state
        .store
        .query(Collection::Healthcheck, &Document::new(), 1)
        .await
    {
        Ok(_) => StorageCheck {
            ok: true,
            error: None,
        },
        Err(e) => {
            warn!("Storage probe failed: {}", e);
            StorageCheck {
                ok: false,
                error: Some(e.to_string()),
            }
        }
    };
    Json(check)
}
