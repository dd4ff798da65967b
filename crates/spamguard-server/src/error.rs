//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use spamguard_core::{ClassifyError, ErrorKind};

/// API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Classification failed.
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// Request body exceeded the size limit before it could be parsed.
    #[error("content too long: request body exceeds {limit_bytes} bytes")]
    BodyTooLarge { limit_bytes: usize },

    /// Request body was rejected by the JSON extractor.
    #[error("invalid request: {message}")]
    Rejected { status: StatusCode, message: String },
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Classify(err) => {
                let kind = err.kind();
                let status = match kind {
                    ErrorKind::ProviderUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                    ErrorKind::SchemaValidationFailed => StatusCode::BAD_GATEWAY,
                    ErrorKind::ProviderRefused => StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorKind::ContentTooLong => StatusCode::PAYLOAD_TOO_LARGE,
                };
                (status, kind.code())
            }
            ApiError::BodyTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, ErrorKind::ContentTooLong.code())
            }
            ApiError::Rejected { status, .. } => (*status, "invalid_request"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
