use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

use evidence_common::api::ErrorResponse;
use evidence_common::error::CommonError;
use evidence_common::serper::SerperClientError;

pub const EMPTY_QUERY_DETAIL: &str = "Query cannot be empty";
pub const SEARCH_PROVIDER_DETAIL: &str = "Serper API error";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("config error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("search provider error: status={status} detail={detail}")]
    Upstream { status: StatusCode, detail: String },
}

impl AppError {
    pub fn empty_query() -> Self {
        AppError::Validation(EMPTY_QUERY_DETAIL.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { status, .. } => *status,
            AppError::Common(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::Validation(detail) | AppError::Upstream { detail, .. } => detail.clone(),
            AppError::Common(_) | AppError::Config(_) => "Internal server error".to_string(),
        }
    }
}

/// Mirrors the provider's status when it answered; transport failures become 502.
impl From<SerperClientError> for AppError {
    fn from(err: SerperClientError) -> Self {
        warn!(error = %err, "search provider call failed");
        let status = err
            .upstream_status()
            .and_then(|s| StatusCode::from_u16(s.as_u16()).ok())
            .filter(|s| !s.is_success())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        AppError::Upstream {
            status,
            detail: SEARCH_PROVIDER_DETAIL.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            detail: self.detail(),
        };
        (self.status(), Json(body)).into_response()
    }
}
