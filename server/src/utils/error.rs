use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;
use crate::utils::response::error as error_response;

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub location: &'static str,
}

impl FieldError {
    pub fn body(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            location: "body",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed on {} field(s)", .0.len())]
    ValidationError(Vec<FieldError>),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Store error")]
    Store(#[from] StoreError),

    /// A follow-up write failed and so did its compensation; the store is
    /// left partially updated.
    #[error("Partial write after {step}: {cause}")]
    PartialWrite { step: &'static str, cause: String },

    #[error("Internal server error")]
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_)
            | AppError::PartialWrite { .. }
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) => "AUTH_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Store(_) => "STORE_ERROR",
            AppError::PartialWrite { .. } => "PARTIAL_WRITE",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(fields) => {
                tracing::debug!(fields = ?fields, "Request failed validation");
            }
            AppError::AuthError(msg) | AppError::Unauthorized(msg) | AppError::NotFound(msg) => {
                tracing::info!(code = self.code(), message = %msg, "Request rejected");
            }
            AppError::Store(e) => {
                error!(error = ?e, "Store error");
            }
            AppError::PartialWrite { step, cause } => {
                error!(step, cause = %cause, "Store left partially updated");
            }
            AppError::InternalServerError(msg) => {
                error!(message = %msg, "Internal server error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Faults are logged above; clients only get a generic message.
        let (public_message, details) = match self {
            AppError::ValidationError(fields) => {
                ("Validation failed".to_string(), Some(json!(fields)))
            }
            AppError::AuthError(msg) | AppError::Unauthorized(msg) | AppError::NotFound(msg) => {
                (msg, None)
            }
            AppError::PartialWrite { step, .. } => (
                "Internal Server Error".to_string(),
                Some(json!({ "step": step })),
            ),
            AppError::Store(_) | AppError::InternalServerError(_) => {
                ("Internal Server Error".to_string(), None)
            }
        };

        error_response(code, public_message, details, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::ValidationError(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("Unauthorized".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::NotFound("Club not found.".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Store(StoreError::Unavailable("find_event")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let err = AppError::ValidationError(vec![FieldError::body("title", "min length is 2")]);
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["details"][0]["field"], "title");
        assert_eq!(body["error"]["details"][0]["location"], "body");
    }

    #[tokio::test]
    async fn test_store_error_is_not_exposed() {
        let (status, body) = body_of(StoreError::Unavailable("insert_event").into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Internal Server Error");
        assert!(body["error"]["details"].is_null());
    }
}
