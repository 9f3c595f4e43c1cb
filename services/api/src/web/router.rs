//! services/api/src/web/router.rs
//!
//! Assembles the HTTP surface: routes, CORS, request tracing, and Swagger UI.

use crate::config::AllowedOrigins;
use crate::web::health::{root_handler, storage_check_handler};
use crate::web::rest::{
    ask_question_handler, create_appointment_handler, list_appointments_handler,
    subscribe_newsletter_handler, ApiDoc,
};
use crate::web::state::AppState;
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the complete application router around `app_state`.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    let cors = cors_layer(&app_state.config.allowed_origins);

    let api_router = Router::new()
        .route("/", get(root_handler))
        .route("/test", get(storage_check_handler))
        .route(
            "/appointments",
            post(create_appointment_handler).get(list_appointments_handler),
        )
        .route("/newsletter", post(subscribe_newsletter_handler))
        .route("/questions", post(ask_question_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Any origin is allowed without credentials; an explicit list also allows credentials.
pub fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    match origins {
        AllowedOrigins::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        AllowedOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin '{}'", origin);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(values))
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
        }
    }
}
