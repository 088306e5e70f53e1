//! Domain error to HTTP response mapping
//!
//! Every failure leaves the server as `{"status_code": <int>, "message":
//! <str>, "error": <detail|null>}`. Internal errors are logged with their
//! cause and reported to the caller with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use taskly_core::TasklyError;
use tracing::error;

/// Wire format of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
    pub error: Option<String>,
}

/// Newtype making `TasklyError` usable as an axum rejection
#[derive(Debug)]
pub struct ApiError(pub TasklyError);

impl From<TasklyError> for ApiError {
    fn from(error: TasklyError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match &self.0 {
            TasklyError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                "Not Found",
                Some(self.0.to_string()),
            ),
            TasklyError::Conflict { .. } => {
                (StatusCode::CONFLICT, "Conflict", Some(self.0.to_string()))
            }
            TasklyError::Validation { .. } | TasklyError::UnknownField { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Unprocessable Entity",
                Some(self.0.to_string()),
            ),
            other => {
                error!("Internal error: {other}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
        };

        let body = ErrorBody {
            status_code: status.as_u16(),
            message: message.to_string(),
            error: detail,
        };
        (status, Json(body)).into_response()
    }
}
