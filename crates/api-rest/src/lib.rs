//! # API REST
//!
//! REST API for antenatal dating.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, display strings, CORS)
//!
//! Dating arithmetic and the pregnancy lifecycle live in `antenatal-core`; handlers only parse,
//! delegate and map errors to status codes.

#![warn(rust_2018_idioms)]

pub mod dto;
mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use antenatal_core::{Clock, CoreConfig, PregnancyStore};

/// Shared state for every request handler.
///
/// The store sits behind a mutex: there is a single active pregnancy and every mutation is
/// a short, synchronous critical section.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    clock: Arc<dyn Clock>,
    store: Arc<Mutex<PregnancyStore>>,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            cfg,
            store: Arc::new(Mutex::new(PregnancyStore::new(clock.clone()))),
            clock,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::calculate_edd,
        handlers::preview_summary,
        handlers::trimester,
        handlers::get_pregnancy,
        handlers::create_pregnancy,
        handlers::update_pregnancy,
        handlers::complete_pregnancy,
        handlers::remove_pregnancy,
    ),
    components(schemas(
        dto::HealthRes,
        dto::EddReq,
        dto::EddRes,
        dto::DatingPreviewReq,
        dto::GestationalAgeDto,
        dto::TrimesterDto,
        dto::DatingSummaryRes,
        dto::CreatePregnancyReq,
        dto::PregnancyFieldChange,
        dto::UpdatePregnancyReq,
        dto::CompletePregnancyReq,
        dto::OutcomeDetailsRes,
        dto::PregnancyRes,
    ))
)]
pub struct ApiDoc;

/// Builds the full application router, Swagger UI included.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/dating/edd", post(handlers::calculate_edd))
        .route("/dating/summary", post(handlers::preview_summary))
        .route("/dating/trimester/:weeks", get(handlers::trimester))
        .route(
            "/pregnancy",
            get(handlers::get_pregnancy)
                .post(handlers::create_pregnancy)
                .patch(handlers::update_pregnancy)
                .delete(handlers::remove_pregnancy),
        )
        .route("/pregnancy/complete", post(handlers::complete_pregnancy))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
