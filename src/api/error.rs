use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::DomainError;

/// Lets handlers return `Result<T, ApiError>` and use `?` on domain calls.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            DomainError::Configuration(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "CONFIGURATION_ERROR")
            }
            DomainError::Retrieval(_) => (StatusCode::BAD_GATEWAY, "RETRIEVAL_ERROR"),
            DomainError::Generation(_) => (StatusCode::BAD_GATEWAY, "GENERATION_ERROR"),
            DomainError::ExternalService(_) => (StatusCode::BAD_GATEWAY, "EXTERNAL_SERVICE_ERROR"),
            DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            DomainError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.0.to_string()
            }
        }));

        (status, body).into_response()
    }
}
