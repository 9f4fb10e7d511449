use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use shared::responses::ApiResponse;
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::staff::violation_messages;

// Staff Service Error
#[derive(Debug, Error)]
pub enum StaffServiceError {
    /// One message per violated field, e.g. a duplicate rfid and a duplicate email.
    #[error("Validation Error: {}", .0.join(" "))]
    Validation(Vec<String>),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for StaffServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, %status, "Server error");
        } else {
            tracing::warn!(error = %self, %status, "Client error");
        }

        let body = match self {
            Self::Validation(errors) => ApiResponse::<()>::invalid("Validation failed", errors),
            Self::NotFound(message) | Self::Internal(message) => ApiResponse::<()>::err(message),
            Self::Database(_) => ApiResponse::<()>::err(
                "Oof, Something went wrong while accessing the database.",
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<ValidationErrors> for StaffServiceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(violation_messages(&errors))
    }
}
