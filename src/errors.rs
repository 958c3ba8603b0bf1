// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Every failure a request can hit, grouped the way clients see them.
/// Client mistakes map to 4xx, failures of the managed backend map to 5xx.
/// A duplicate vote under the immutable policy is NOT an error (see VoteStatus).
#[derive(Error, Debug)]
pub enum HotspotError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl HotspotError {
    fn error_code(&self) -> &'static str {
        match self {
            HotspotError::ValidationError(_) => "VALIDATION_ERROR",
            HotspotError::NotFound(_) => "NOT_FOUND",
            HotspotError::DatabaseError(_) => "DATABASE_ERROR",
            HotspotError::StorageError(_) => "STORAGE_ERROR",
        }
    }
}

/// Convert HotspotError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for HotspotError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            HotspotError::ValidationError(_) => StatusCode::BAD_REQUEST,
            HotspotError::NotFound(_) => StatusCode::NOT_FOUND,
            HotspotError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HotspotError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for HotspotError {
    fn from(errors: validator::ValidationErrors) -> Self {
        HotspotError::ValidationError(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            HotspotError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HotspotError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            HotspotError::DatabaseError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            HotspotError::StorageError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_error_body_carries_backend_message() {
        let err = HotspotError::StorageError("bucket not found".to_string());
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "STORAGE_ERROR");
        assert_eq!(body["error"]["message"], "Storage error: bucket not found");
        assert!(body["error"]["timestamp"].is_string());
    }
}
