use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tts_core::ProviderError;

/// API Error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    /// Provider failure; the message is passed through untouched
    #[error("{0}")]
    Provider(String),

    #[error("Speech synthesis timed out after {0} seconds")]
    Timeout(u64),

    #[error("{0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<ProviderError> for ApiError {
    fn from(e: ProviderError) -> Self {
        ApiError::Provider(e.to_string())
    }
}

/// Error response structure
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Provider(_) | ApiError::Timeout(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Provider(msg) => tracing::error!("Provider error: {}", msg),
            ApiError::Timeout(secs) => tracing::error!("Provider timed out after {}s", secs),
            ApiError::InternalError(msg) => tracing::error!("Internal error: {}", msg),
            ApiError::InvalidInput(msg) | ApiError::Forbidden(msg) => {
                tracing::debug!("Rejected request: {}", msg)
            }
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
