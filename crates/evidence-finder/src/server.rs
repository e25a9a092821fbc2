/// HTTP surface of the evidence finder.
///
/// Routes:
/// - `GET /api/health`: liveness
/// - `GET /api/source-types`: filterable source categories with display labels
/// - `POST /api/search`: run the evidence pipeline for a claim or question
use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};

use evidence_common::api::{HealthResponse, SearchRequest, SearchResponse, SourceTypesResponse};

use crate::error::AppError;
use crate::service::EvidenceService;

#[derive(Clone)]
pub struct AppState {
    service: Arc<EvidenceService>,
}

impl AppState {
    pub fn new(service: Arc<EvidenceService>) -> Self {
        Self { service }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/source-types", get(source_types))
        .route("/api/search", post(search))
        .with_state(state)
}

/// CORS for the browser frontend. Any method and header is allowed; credentialed requests
/// cannot use wildcards, so the preflight's requested method and headers are echoed back.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, AppError> {
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o)
                .map_err(|e| AppError::Config(format!("invalid CORS origin '{o}': {e}")))
        })
        .collect::<Result<Vec<HeaderValue>, AppError>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Evidence Finder API is running".to_string(),
    })
}

async fn source_types() -> Json<SourceTypesResponse> {
    Json(SourceTypesResponse::all())
}

async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let response = state.service.find_evidence(request).await?;
    Ok(Json(response))
}
