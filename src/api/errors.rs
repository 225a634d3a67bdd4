//! # API Errors
//!
//! Error taxonomy for the gateway. Errors are classified by who caused them:
//! malformed requests and unknown keys are the client's fault, engine-reported
//! failures pass their message through, and anything unanticipated is hidden
//! behind a generic message so no internal detail crosses the API boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::response::ResponseEnvelope;
use crate::session::engine::SessionError;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway error taxonomy
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Malformed request shape (missing fields, bad JSON, invalid op)
    #[error("{0}")]
    Validation(String),

    /// Missing or unknown API key (generic - don't leak which)
    #[error("Valid API key is required")]
    Unauthorized,

    /// Failure reported by the configuration engine, message passed through
    #[error("{0}")]
    Domain(String),

    /// Anything unanticipated. The detail is logged server-side only;
    /// clients see the generic message.
    #[error("internal error")]
    Internal(String),
}

impl ApiError {
    /// Validation error for an unrecognized operation string
    pub fn invalid_operation(op: &str) -> Self {
        ApiError::Validation(format!("\"{}\" is not a valid operation", op))
    }

    /// Validation error for a required field absent from the request
    pub fn missing_field(name: &str) -> Self {
        ApiError::Validation(format!("Missing required field \"{}\"", name))
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Domain(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Full server-side detail, including what the generic message hides
    pub fn detail(&self) -> &str {
        match self {
            ApiError::Validation(msg) | ApiError::Domain(msg) | ApiError::Internal(msg) => msg,
            ApiError::Unauthorized => "Valid API key is required",
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Domain(msg) => ApiError::Domain(msg),
            SessionError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(detail = %detail, "unexpected error while handling request");
        }
        let status = self.status_code();
        let body = ResponseEnvelope::failure(self.to_string());
        (status, Json(body)).into_response()
    }
}
