//! API Errors
//! Mission: One error type, one translator into the JSON envelope

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::store::is_unique_violation;

pub const UNAUTHORIZED_ACCESS: &str = "Unauthorized access";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const DUPLICATE_FIELD: &str = "Duplicate field value entered";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed input (400)
    #[error("{0}")]
    Validation(String),
    /// Missing/invalid/expired token or bad credentials (401)
    #[error("{0}")]
    Unauthorized(String),
    /// Wrong role for the operation; reported as 401
    #[error("{0}")]
    Forbidden(String),
    /// Absent resource, or one the caller does not own (404)
    #[error("{0}")]
    NotFound(String),
    /// Server-side failure with a message safe to show (500)
    #[error("{0}")]
    Server(String),
    #[error("Server Error")]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) | ApiError::Forbidden(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Server(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized(UNAUTHORIZED_ACCESS.to_string())
    }

    pub fn invalid_credentials() -> Self {
        ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if is_unique_violation(&err) {
            ApiError::Validation(DUPLICATE_FIELD.to_string())
        } else {
            ApiError::Internal(err)
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(err) = &self {
            error!("Internal error: {:#}", err);
        }

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::unauthorized().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Forbidden("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_anyhow_conversion() {
        let api_err: ApiError = anyhow::anyhow!("disk on fire").into();
        assert!(matches!(api_err, ApiError::Internal(_)));
    }

    #[tokio::test]
    async fn test_internal_details_not_leaked() {
        let response = ApiError::Internal(anyhow::anyhow!("SELECT * FROM users failed"))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Server Error");
    }

    #[tokio::test]
    async fn test_envelope_shape() {
        let response = ApiError::NotFound("No order found with id 42".into()).into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "No order found with id 42");
        assert!(body.get("data").is_none());
    }
}
